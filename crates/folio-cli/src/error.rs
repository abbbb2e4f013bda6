use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] folio_core::ValidationError),

    #[error(transparent)]
    Constituents(#[from] folio_core::ConstituentsError),

    #[error(transparent)]
    Ranking(#[from] folio_core::RankingError),

    #[error(transparent)]
    Config(#[from] folio_core::ConfigError),

    #[error("source error: {0}")]
    Source(String),

    #[error("input closed before a portfolio value was entered")]
    InputClosed,

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Constituents(_) | Self::InputClosed => 2,
            Self::Ranking(_) => 3,
            Self::Config(_) | Self::Source(_) | Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}
