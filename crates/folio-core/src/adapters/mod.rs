//! Quote source implementations.
//!
//! | Source | Description |
//! |--------|-------------|
//! | [`IexCloudSource`] | IEX Cloud v1 `quote` and `advanced_stats` endpoints |
//! | [`MockSource`] | Deterministic offline data seeded from the ticker |

mod iex;
mod mock;

pub use iex::{IexCloudSource, IEX_MAX_BATCH_SIZE};
pub use mock::MockSource;
