//! Daily OHLC client for stock tickers and volatility indices.
//!
//! Backed by a Yahoo-chart-style endpoint: no daily quota, but the same
//! retry policy and response cache as the option client. Rows with missing
//! OHLC values are dropped during normalization.

use std::sync::Arc;

use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::cache::CacheStore;
use crate::http::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::retry::{send_with_retry, RetryConfig};
use crate::{Bar, FetchError, PriceSeries, Symbol, ValidationError};

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Ticker of the CBOE volatility index on the chart endpoint.
pub const VIX_SYMBOL: &str = "^VIX";

/// Client for the underlying-asset/index daily OHLC endpoint.
#[derive(Clone)]
pub struct IndexClient {
    http: Arc<dyn HttpClient>,
    retry: RetryConfig,
    cache: CacheStore,
}

impl IndexClient {
    pub fn new(cache: CacheStore) -> Self {
        Self {
            http: Arc::new(ReqwestHttpClient::new()),
            retry: RetryConfig::default(),
            cache,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Daily bars for a stock or index symbol over an inclusive date range.
    pub async fn fetch_daily(
        &self,
        symbol: &Symbol,
        from: Date,
        to: Date,
    ) -> Result<PriceSeries, FetchError> {
        if from > to {
            return Err(ValidationError::InvalidDateRange { from, to }.into());
        }

        let cache_key = format!("chart:{symbol}:{from}:{to}");
        if let Some(value) = self.cache.get(&cache_key).await {
            match serde_json::from_value::<PriceSeries>(value) {
                Ok(series) => {
                    tracing::debug!(%symbol, "daily bars served from cache");
                    return Ok(series);
                }
                Err(error) => {
                    tracing::warn!(%symbol, %error, "discarding undecodable cache entry");
                }
            }
        }

        let period1 = from.midnight().assume_utc().unix_timestamp();
        // Chart ranges are end-exclusive; push one day so `to` is included.
        let period2 = to.midnight().assume_utc().unix_timestamp() + 24 * 3600;
        let url = format!(
            "{BASE_URL}/v8/finance/chart/{}?period1={period1}&period2={period2}&interval=1d",
            urlencoding::encode(symbol.as_str()),
        );
        let request = HttpRequest::get(url).with_header("referer", "https://finance.yahoo.com/");
        let response = send_with_retry(&self.http, request, &self.retry).await?;

        let payload: ChartResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Decode(format!("chart payload: {e}")))?;
        let series = normalize_chart(symbol, payload)?;

        if let Ok(value) = serde_json::to_value(&series) {
            self.cache.set(cache_key, value).await;
        }
        tracing::info!(%symbol, bars = series.len(), "fetched daily bars");

        Ok(series)
    }
}

/// Flatten the chart payload's parallel arrays into canonical bars.
fn normalize_chart(symbol: &Symbol, payload: ChartResponse) -> Result<PriceSeries, FetchError> {
    if let Some(error) = payload.chart.error {
        return Err(FetchError::Decode(format!("chart API error: {error}")));
    }

    let result = payload
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| FetchError::NoData {
            symbol: symbol.to_string(),
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) else {
            continue;
        };

        let date = OffsetDateTime::from_unix_timestamp(ts)
            .map_err(|e| FetchError::Decode(format!("chart timestamp {ts}: {e}")))?
            .date();
        // Intraday timestamps can repeat a date; keep the first row per day.
        if bars.last().is_some_and(|prev: &Bar| prev.date == date) {
            continue;
        }

        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
        bars.push(Bar::new(date, *open, *high, *low, *close, volume)?);
    }

    if bars.is_empty() {
        return Err(FetchError::NoData {
            symbol: symbol.to_string(),
        });
    }

    Ok(PriceSeries::from_bars(symbol.clone(), bars)?)
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_body(timestamps: &[i64], closes: &[Option<f64>]) -> String {
        let opens: Vec<Option<f64>> = closes.to_vec();
        serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": {
                        "quote": [{
                            "open": opens,
                            "high": closes,
                            "low": closes,
                            "close": closes,
                            "volume": timestamps.iter().map(|_| Some(10u64)).collect::<Vec<_>>(),
                        }]
                    }
                }],
                "error": null
            }
        })
        .to_string()
    }

    #[test]
    fn skips_rows_with_missing_ohlc() {
        let symbol = Symbol::parse("MSFT").expect("valid");
        let body = chart_body(
            &[1_745_539_200, 1_745_625_600, 1_745_712_000],
            &[Some(10.0), None, Some(12.0)],
        );
        let payload: ChartResponse = serde_json::from_str(&body).expect("decodes");

        let series = normalize_chart(&symbol, payload).expect("normalizes");
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest_close(), Some(12.0));
    }

    #[test]
    fn all_null_rows_is_no_data() {
        let symbol = Symbol::parse("MSFT").expect("valid");
        let body = chart_body(&[1_745_539_200], &[None]);
        let payload: ChartResponse = serde_json::from_str(&body).expect("decodes");

        let err = normalize_chart(&symbol, payload).expect_err("must fail");
        assert!(matches!(err, FetchError::NoData { .. }));
    }

    #[test]
    fn chart_error_field_surfaces_as_decode_error() {
        let symbol = Symbol::parse("MSFT").expect("valid");
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let payload: ChartResponse = serde_json::from_str(body).expect("decodes");

        let err = normalize_chart(&symbol, payload).expect_err("must fail");
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
