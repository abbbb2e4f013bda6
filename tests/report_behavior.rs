//! Behavior-driven tests for constituents input and report output
//!
//! These tests walk a full run from a constituents file to the report rows
//! a renderer receives, checking column order and cell typing.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use folio_core::{
    load_constituents, BatchFetcher, BatchPacer, Cell, ConstituentsError, MetricKey, MockSource,
    PortfolioValue, PositionSizer, QuoteRecord, Ranker, Report, StrategyKind, Universe,
};

fn write_constituents(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sp_500_stocks.csv");
    fs::write(&path, contents).expect("write constituents");
    (dir, path)
}

// =============================================================================
// Constituents
// =============================================================================

#[test]
fn when_a_constituents_file_is_loaded_order_is_kept_and_repeats_dropped() {
    // Given: A published-style list with a BOM, quoting and a repeat
    let (_dir, path) = write_constituents(
        "\u{feff}Name,Ticker\n\"Apple, Inc.\",AAPL\nBerkshire,\"BRK.B\"\n\nApple again,AAPL\nMicrosoft,MSFT\n",
    );

    // When: Loaded
    let symbols = load_constituents(&path).expect("loads");

    // Then: First occurrences only, in file order
    let tickers = symbols.iter().map(|symbol| symbol.as_str()).collect::<Vec<_>>();
    assert_eq!(tickers, vec!["AAPL", "BRK.B", "MSFT"]);
}

#[test]
fn when_a_ticker_is_invalid_the_line_is_reported() {
    // Given: A bad ticker on line 3
    let (_dir, path) = write_constituents("Ticker\nAAPL\n1BAD\n");

    // When: Loaded
    let err = load_constituents(&path).expect_err("must fail");

    // Then: The line number is kept
    assert!(matches!(err, ConstituentsError::InvalidTicker { line: 3, .. }));
}

#[test]
fn when_the_file_is_missing_an_io_error_names_it() {
    // Given: A path that does not exist
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.csv");

    // When: Loaded
    let err = load_constituents(&path).expect_err("must fail");

    // Then: Io with the path
    assert_eq!(err.code(), "constituents.io");
    assert!(err.to_string().contains("absent.csv"));
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn when_hqm_runs_end_to_end_the_report_has_return_and_percentile_pairs() {
    // Given: Eight constituents served by the mock source
    let (_dir, path) = write_constituents("Ticker\nAAPL\nMSFT\nGOOG\nAMZN\nMETA\nNVDA\nTSLA\nNFLX\n");
    let symbols = load_constituents(&path).expect("loads");
    let config = StrategyKind::HighQualityMomentum.config().with_top_n(5).expect("valid");
    let fetcher = BatchFetcher::new(
        Arc::new(MockSource::with_batch_size(3)),
        BatchPacer::new(Duration::from_millis(1), 1_000),
    );

    // When: Fetched, ranked, sized and reported
    let outcome = fetcher
        .fetch(&symbols, &config.metric_keys())
        .await
        .expect("fetch completes");
    let selection = Ranker::new(config.clone()).rank(&outcome.universe).expect("ranks");
    let allocations = PositionSizer::new(PortfolioValue::new(100_000.0).expect("positive"))
        .size(&selection.entries)
        .expect("sizes");
    let report = Report::build(&config, &selection, &allocations);

    // Then: Fixed column order, five rows, scores best first
    assert_eq!(
        report.columns,
        vec![
            "Ticker",
            "Price",
            "Number of Shares to Buy",
            "One-Year Price Return",
            "One-Year Price Return Percentile",
            "Six-Month Price Return",
            "Six-Month Price Return Percentile",
            "Three-Month Price Return",
            "Three-Month Price Return Percentile",
            "One-Month Price Return",
            "One-Month Price Return Percentile",
            "HQM Score",
        ]
    );
    assert_eq!(report.rows.len(), 5);

    let score_column = report.column_index("HQM Score").expect("score column");
    let scores = report
        .rows
        .iter()
        .map(|row| match row[score_column] {
            Cell::Percent(score) => score,
            ref other => panic!("unexpected score cell {other:?}"),
        })
        .collect::<Vec<_>>();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));

    for row in &report.rows {
        assert_eq!(row.len(), report.columns.len());
        assert!(matches!(row[1], Cell::Dollar(_)));
        assert!(matches!(row[2], Cell::Integer(_)));
    }
}

#[test]
fn when_a_raw_value_is_missing_the_report_cell_is_empty_not_zero() {
    // Given: Robust value with a missing P/B for one stock
    let universe = Universe::new(vec![
        QuoteRecord::new(
            "AAA",
            Some(10.0),
            [
                (MetricKey::PeRatio, Some(10.0)),
                (MetricKey::PbRatio, None),
                (MetricKey::PsRatio, Some(1.0)),
                (MetricKey::EvToEbitda, Some(8.0)),
                (MetricKey::EvToGrossProfit, Some(4.0)),
            ],
        )
        .expect("valid"),
        QuoteRecord::new(
            "BBB",
            Some(20.0),
            [
                (MetricKey::PeRatio, Some(20.0)),
                (MetricKey::PbRatio, Some(3.0)),
                (MetricKey::PsRatio, Some(2.0)),
                (MetricKey::EvToEbitda, Some(9.0)),
                (MetricKey::EvToGrossProfit, Some(5.0)),
            ],
        )
        .expect("valid"),
    ])
    .expect("unique");
    let config = StrategyKind::RobustValue.config();

    // When: Ranked and reported
    let selection = Ranker::new(config.clone()).rank(&universe).expect("ranks");
    let allocations = PositionSizer::new(PortfolioValue::new(1_000.0).expect("positive"))
        .size(&selection.entries)
        .expect("sizes");
    let report = Report::build(&config, &selection, &allocations);

    // Then: AAA's raw P/B shows as empty while its percentile uses the imputed mean
    let aaa = report
        .rows
        .iter()
        .find(|row| row[0] == Cell::Text(String::from("AAA")))
        .expect("AAA reported");
    let pb = report.column_index("Price-to-Book Ratio").expect("pb column");
    assert_eq!(aaa[pb], Cell::Empty);
    assert!(matches!(aaa[pb + 1], Cell::Percent(_)));
    assert_eq!(report.column_index("RV Score"), Some(report.columns.len() - 1));

    let json = serde_json::to_value(&report).expect("serializes");
    assert_eq!(json["strategy"], "rv");
}
