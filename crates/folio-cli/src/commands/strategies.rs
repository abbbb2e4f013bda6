use folio_core::{Cell, Report, StrategyKind};
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

const COLUMNS: [&str; 5] = ["Strategy", "Mode", "Metrics", "Top N", "Description"];

pub fn run() -> Result<CommandResult, CliError> {
    let mut rows = Vec::with_capacity(StrategyKind::ALL.len());
    let mut strategies = Vec::with_capacity(StrategyKind::ALL.len());

    for kind in StrategyKind::ALL {
        let config = kind.config();
        let metrics = config
            .metrics
            .iter()
            .map(|metric| metric.key.label())
            .collect::<Vec<_>>()
            .join(", ");
        let top_n = config
            .top_n
            .map_or_else(|| String::from("all"), |top_n| top_n.to_string());

        rows.push(vec![
            Cell::Text(kind.as_str().to_owned()),
            Cell::Text(config.mode.as_str().to_owned()),
            Cell::Text(metrics),
            Cell::Text(top_n),
            Cell::Text(kind.description().to_owned()),
        ]);
        strategies.push(json!({
            "id": kind,
            "description": kind.description(),
            "config": config,
        }));
    }

    let report = Report {
        strategy: String::from("strategies"),
        columns: COLUMNS.iter().map(|column| (*column).to_owned()).collect(),
        rows,
    };

    Ok(CommandResult::ok(json!({ "strategies": strategies }), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_builtin_strategy() {
        let result = run().expect("lists strategies");

        assert_eq!(result.report.rows.len(), StrategyKind::ALL.len());
        assert_eq!(result.data["strategies"][2]["id"], "hqm");
        assert_eq!(result.data["strategies"][2]["config"]["mode"], "composite");
        assert_eq!(result.report.rows[0][3], Cell::Text(String::from("all")));
        assert_eq!(result.report.rows[1][1], Cell::Text(String::from("by_metric")));
    }
}
