use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::data_source::{BatchRequest, QuoteBatch, QuoteSource, RawQuote, SourceError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{IexConfig, MetricKey, ProviderId, Symbol};

/// IEX Cloud allows at most this many symbols per batch call.
pub const IEX_MAX_BATCH_SIZE: usize = 100;

/// IEX Cloud v1 core data source.
///
/// Each batch costs one `/data/core/quote` call, plus one
/// `/data/core/advanced_stats` call when a requested metric is not part of
/// the quote payload. Both endpoints answer with an array aligned with the
/// requested symbols; `null` or `{}` entries mean IEX has no data.
#[derive(Clone)]
pub struct IexCloudSource {
    config: IexConfig,
    http_client: Arc<dyn HttpClient>,
}

impl IexCloudSource {
    pub fn new(config: IexConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self, dataset: &str, symbols: &[Symbol]) -> String {
        let csv = symbols
            .iter()
            .map(|symbol| urlencoding::encode(symbol.as_str()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/data/core/{dataset}/{csv}?token={}",
            self.config.base_url(),
            urlencoding::encode(self.config.token())
        )
    }

    async fn get_array<T: DeserializeOwned>(
        &self,
        dataset: &str,
        symbols: &[Symbol],
    ) -> Result<Vec<Option<T>>, SourceError> {
        let request = HttpRequest::get(self.endpoint(dataset, symbols))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms());

        debug!(dataset, symbols = symbols.len(), "requesting iex batch");

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("iex {dataset} transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            let message = format!("iex {dataset} returned status {}", response.status);
            return Err(if (400..500).contains(&response.status) {
                SourceError::invalid_request(message)
            } else {
                SourceError::unavailable(message)
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            SourceError::internal(format!("failed to parse iex {dataset} response: {e}"))
        })
    }

    async fn fetch_batch(&self, req: BatchRequest) -> Result<QuoteBatch, SourceError> {
        if req.symbols.len() > IEX_MAX_BATCH_SIZE {
            return Err(SourceError::invalid_request(format!(
                "iex batches are limited to {IEX_MAX_BATCH_SIZE} symbols, got {}",
                req.symbols.len()
            )));
        }

        let quotes = self.get_array::<IexQuote>("quote", &req.symbols).await?;
        let stats = if req.needs_advanced_stats() {
            Some(
                self.get_array::<IexAdvancedStats>("advanced_stats", &req.symbols)
                    .await?,
            )
        } else {
            None
        };

        if quotes.len() != req.symbols.len() {
            warn!(
                requested = req.symbols.len(),
                returned = quotes.len(),
                "iex quote response length does not match request"
            );
        }

        let mut batch = QuoteBatch::default();
        for (index, symbol) in req.symbols.iter().enumerate() {
            let Some(quote) = quotes.get(index).and_then(Option::as_ref) else {
                continue;
            };
            if quote.is_empty() {
                continue;
            }

            let stats = stats
                .as_ref()
                .and_then(|stats| stats.get(index))
                .and_then(Option::as_ref);

            let raw = req.metrics.iter().fold(
                RawQuote::new(symbol.clone(), quote.latest_price),
                |raw, key| {
                    let value = metric_value(*key, quote, stats);
                    raw.with_metric(*key, value)
                },
            );
            batch.quotes.push(raw);
        }

        Ok(batch)
    }
}

impl QuoteSource for IexCloudSource {
    fn id(&self) -> ProviderId {
        ProviderId::Iex
    }

    fn max_batch_size(&self) -> usize {
        IEX_MAX_BATCH_SIZE
    }

    fn fetch<'a>(
        &'a self,
        req: BatchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteBatch, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_batch(req))
    }
}

fn metric_value(key: MetricKey, quote: &IexQuote, stats: Option<&IexAdvancedStats>) -> Option<f64> {
    match key {
        MetricKey::MarketCap => quote.market_cap,
        MetricKey::PeRatio => quote.pe_ratio,
        MetricKey::OneYearReturn => stats?.year1_change_percent,
        MetricKey::SixMonthReturn => stats?.month6_change_percent,
        MetricKey::ThreeMonthReturn => stats?.month3_change_percent,
        MetricKey::OneMonthReturn => stats?.month1_change_percent,
        MetricKey::PbRatio => stats?.price_to_book,
        MetricKey::PsRatio => stats?.price_to_sales,
        MetricKey::EvToEbitda => {
            let stats = stats?;
            ratio(stats.enterprise_value, stats.ebitda)
        }
        MetricKey::EvToGrossProfit => {
            let stats = stats?;
            ratio(stats.enterprise_value, stats.gross_profit)
        }
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|value| value.is_finite())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IexQuote {
    symbol: Option<String>,
    latest_price: Option<f64>,
    market_cap: Option<f64>,
    pe_ratio: Option<f64>,
}

impl IexQuote {
    fn is_empty(&self) -> bool {
        self.symbol.is_none()
            && self.latest_price.is_none()
            && self.market_cap.is_none()
            && self.pe_ratio.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IexAdvancedStats {
    year1_change_percent: Option<f64>,
    month6_change_percent: Option<f64>,
    month3_change_percent: Option<f64>,
    month1_change_percent: Option<f64>,
    price_to_book: Option<f64>,
    price_to_sales: Option<f64>,
    enterprise_value: Option<f64>,
    #[serde(rename = "EBITDA")]
    ebitda: Option<f64>,
    gross_profit: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse, ScriptedHttpClient};
    use crate::DEFAULT_IEX_BASE_URL;

    fn source(client: Arc<ScriptedHttpClient>) -> IexCloudSource {
        let config = IexConfig::new("pk_test", DEFAULT_IEX_BASE_URL).expect("valid config");
        IexCloudSource::new(config, client)
    }

    fn request(symbols: &[&str], metrics: &[MetricKey]) -> BatchRequest {
        BatchRequest::new(
            symbols
                .iter()
                .map(|value| Symbol::parse(value).expect("valid symbol"))
                .collect(),
            metrics.to_vec(),
        )
        .expect("valid request")
    }

    #[tokio::test]
    async fn quote_only_metrics_issue_a_single_call() {
        let client = Arc::new(ScriptedHttpClient::new([Ok(HttpResponse::ok_json(
            r#"[{"symbol":"AAPL","latestPrice":190.5,"peRatio":29.1,"marketCap":2.9e12},
                {"symbol":"BRK.B","latestPrice":410.0,"peRatio":null,"marketCap":8.8e11}]"#,
        ))]));

        let batch = source(client.clone())
            .fetch(request(&["AAPL", "BRK.B"], &[MetricKey::PeRatio]))
            .await
            .expect("batch succeeds");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://api.iex.cloud/v1/data/core/quote/AAPL,BRK.B?token=pk_test"
        );
        assert_eq!(batch.quotes.len(), 2);
        assert_eq!(batch.quotes[0].price, Some(190.5));
        assert_eq!(batch.quotes[0].metrics[&MetricKey::PeRatio], Some(29.1));
        assert_eq!(batch.quotes[1].metrics[&MetricKey::PeRatio], None);
    }

    #[tokio::test]
    async fn advanced_metrics_are_read_from_stats_and_aligned_by_index() {
        let client = Arc::new(ScriptedHttpClient::new([
            Ok(HttpResponse::ok_json(
                r#"[{"symbol":"AAA","latestPrice":10.0},null,{"symbol":"CCC","latestPrice":5.0}]"#,
            )),
            Ok(HttpResponse::ok_json(
                r#"[{"year1ChangePercent":0.5,"enterpriseValue":100.0,"EBITDA":20.0,"grossProfit":0.0},
                    {},
                    {"year1ChangePercent":0.9,"enterpriseValue":50.0,"EBITDA":null,"grossProfit":25.0}]"#,
            )),
        ]));

        let batch = source(client.clone())
            .fetch(request(
                &["AAA", "BBB", "CCC"],
                &[
                    MetricKey::OneYearReturn,
                    MetricKey::EvToEbitda,
                    MetricKey::EvToGrossProfit,
                ],
            ))
            .await
            .expect("batch succeeds");

        assert_eq!(client.requests().len(), 2);
        assert!(client.requests()[1].url.contains("/advanced_stats/AAA,BBB,CCC?"));

        let symbols = batch
            .quotes
            .iter()
            .map(|quote| quote.symbol.as_str())
            .collect::<Vec<_>>();
        assert_eq!(symbols, vec!["AAA", "CCC"]);

        let aaa = &batch.quotes[0];
        assert_eq!(aaa.metrics[&MetricKey::OneYearReturn], Some(0.5));
        assert_eq!(aaa.metrics[&MetricKey::EvToEbitda], Some(5.0));
        assert_eq!(aaa.metrics[&MetricKey::EvToGrossProfit], None);

        let ccc = &batch.quotes[1];
        assert_eq!(ccc.metrics[&MetricKey::EvToEbitda], None);
        assert_eq!(ccc.metrics[&MetricKey::EvToGrossProfit], Some(2.0));
    }

    #[tokio::test]
    async fn server_errors_map_to_unavailable() {
        let client = Arc::new(ScriptedHttpClient::new([Ok(HttpResponse::with_status(
            503,
            "maintenance",
        ))]));

        let err = source(client)
            .fetch(request(&["AAPL"], &[MetricKey::MarketCap]))
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert!(err.message().contains("503"));
    }

    #[tokio::test]
    async fn client_errors_map_to_invalid_request() {
        let client = Arc::new(ScriptedHttpClient::new([Ok(HttpResponse::with_status(
            403,
            "bad token",
        ))]));

        let err = source(client)
            .fetch(request(&["AAPL"], &[MetricKey::MarketCap]))
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn transport_errors_never_echo_the_token() {
        let client = Arc::new(ScriptedHttpClient::new([Err(HttpError::new(
            "connection failed",
        ))]));

        let err = source(client)
            .fetch(request(&["AAPL"], &[MetricKey::MarketCap]))
            .await
            .expect_err("must fail");

        assert!(!err.to_string().contains("pk_test"));
    }

    #[tokio::test]
    async fn malformed_json_is_internal() {
        let client = Arc::new(ScriptedHttpClient::new([Ok(HttpResponse::ok_json("<html>"))]));

        let err = source(client)
            .fetch(request(&["AAPL"], &[MetricKey::MarketCap]))
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected_before_any_call() {
        let client = Arc::new(ScriptedHttpClient::default());
        let symbols = (0..=IEX_MAX_BATCH_SIZE)
            .map(|index| format!("S{index}"))
            .collect::<Vec<_>>();
        let symbols = symbols.iter().map(String::as_str).collect::<Vec<_>>();

        let err = source(client.clone())
            .fetch(request(&symbols, &[MetricKey::MarketCap]))
            .await
            .expect_err("must fail");

        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert!(client.requests().is_empty());
    }

    #[test]
    fn ratio_is_missing_for_zero_denominator() {
        assert_eq!(ratio(Some(10.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(2.0)), None);
        assert_eq!(ratio(Some(10.0), Some(4.0)), Some(2.5));
    }
}
