//! Rate-limited Polygon client for option aggregates and snapshots.
//!
//! Every outbound call consumes the daily quota ledger first, then sleeps
//! any pacing delay, then goes through the shared retry policy. Aggregate
//! responses are cached by symbol and date range.

use std::sync::Arc;

use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::cache::CacheStore;
use crate::http::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::quota::QuotaLedger;
use crate::retry::{send_with_retry, RetryConfig};
use crate::{Bar, FetchError, OptionContract, PriceSeries, Symbol, ValidationError};

const BASE_URL: &str = "https://api.polygon.io";

/// Option snapshot fields used by the analysis pipeline.
///
/// `implied_volatility` is in the provider's percentage units; use
/// [`PolygonClient::fetch_implied_volatility`] for the decimal fraction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionSnapshot {
    pub implied_volatility: Option<f64>,
    pub open_interest: Option<f64>,
}

/// Market-data client wrapping the Polygon REST API.
///
/// The quota ledger is owned by this instance; orchestrators that share a
/// process must share one client for the daily budget to mean anything.
#[derive(Clone)]
pub struct PolygonClient {
    http: Arc<dyn HttpClient>,
    auth: HttpAuth,
    retry: RetryConfig,
    quota: QuotaLedger,
    cache: CacheStore,
}

impl PolygonClient {
    pub fn new(api_key: impl Into<String>, cache: CacheStore) -> Self {
        Self {
            http: Arc::new(ReqwestHttpClient::new()),
            auth: HttpAuth::BearerToken(api_key.into()),
            retry: RetryConfig::default(),
            quota: QuotaLedger::with_system_clock(),
            cache,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_quota(mut self, quota: QuotaLedger) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Daily OHLCV aggregates for a symbol over an inclusive date range.
    pub async fn fetch_aggregates(
        &self,
        symbol: &Symbol,
        from: Date,
        to: Date,
    ) -> Result<PriceSeries, FetchError> {
        if from > to {
            return Err(ValidationError::InvalidDateRange { from, to }.into());
        }

        let cache_key = format!("aggs:{symbol}:{from}:{to}");
        if let Some(value) = self.cache.get(&cache_key).await {
            match serde_json::from_value::<PriceSeries>(value) {
                Ok(series) => {
                    tracing::debug!(%symbol, "aggregates served from cache");
                    return Ok(series);
                }
                Err(error) => {
                    tracing::warn!(%symbol, %error, "discarding undecodable cache entry");
                }
            }
        }

        self.consume_quota().await?;

        let url = format!(
            "{BASE_URL}/v2/aggs/ticker/{}/range/1/day/{from}/{to}?adjusted=true&sort=asc&limit=50000",
            urlencoding::encode(symbol.as_str()),
        );
        let request = HttpRequest::get(url).with_auth(&self.auth);
        let response = send_with_retry(&self.http, request, &self.retry).await?;

        let payload: AggsResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Decode(format!("polygon aggregates: {e}")))?;

        let rows = payload.results.unwrap_or_default();
        if rows.is_empty() {
            return Err(FetchError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut bars = Vec::with_capacity(rows.len());
        for row in rows {
            bars.push(row.into_bar()?);
        }
        let series = PriceSeries::from_bars(symbol.clone(), bars)?;

        if let Ok(value) = serde_json::to_value(&series) {
            self.cache.set(cache_key, value).await;
        }
        tracing::info!(%symbol, bars = series.len(), "fetched aggregates");

        Ok(series)
    }

    /// Current snapshot of an option contract.
    pub async fn fetch_option_snapshot(
        &self,
        contract: &OptionContract,
    ) -> Result<OptionSnapshot, FetchError> {
        self.consume_quota().await?;

        let occ = contract.occ_symbol();
        let url = format!(
            "{BASE_URL}/v3/snapshot/options/{}/{}",
            urlencoding::encode(contract.underlying.as_str()),
            urlencoding::encode(occ.as_str()),
        );
        let request = HttpRequest::get(url).with_auth(&self.auth);
        let response = send_with_retry(&self.http, request, &self.retry).await?;

        let payload: SnapshotResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Decode(format!("polygon snapshot: {e}")))?;

        payload.results.ok_or_else(|| FetchError::NoData {
            symbol: occ.to_string(),
        })
    }

    /// Implied volatility as a decimal fraction (provider reports
    /// percentage units). `Ok(None)` when the snapshot lacks the field.
    pub async fn fetch_implied_volatility(
        &self,
        contract: &OptionContract,
    ) -> Result<Option<f64>, FetchError> {
        let snapshot = self.fetch_option_snapshot(contract).await?;
        match snapshot.implied_volatility {
            Some(percentage) => Ok(Some(percentage / 100.0)),
            None => {
                tracing::debug!(contract = %contract, "snapshot has no implied volatility");
                Ok(None)
            }
        }
    }

    async fn consume_quota(&self) -> Result<(), FetchError> {
        if let Some(pacing) = self.quota.try_acquire()? {
            tracing::debug!(delay_ms = pacing.as_millis() as u64, "pacing request");
            tokio::time::sleep(pacing).await;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AggsResponse {
    results: Option<Vec<AggRow>>,
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    results: Option<OptionSnapshot>,
}

#[derive(Debug, Deserialize)]
struct AggRow {
    /// Bar start as milliseconds since the Unix epoch.
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: Option<f64>,
}

impl AggRow {
    fn into_bar(self) -> Result<Bar, FetchError> {
        let date = OffsetDateTime::from_unix_timestamp(self.t / 1000)
            .map_err(|e| FetchError::Decode(format!("aggregate timestamp {}: {e}", self.t)))?
            .date();
        let volume = self.v.unwrap_or(0.0).max(0.0).round() as u64;
        Ok(Bar::new(date, self.o, self.h, self.l, self.c, volume)?)
    }
}
