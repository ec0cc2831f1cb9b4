//! Analysis orchestrator: fetch, compute, interpret.
//!
//! Fetches run one at a time through the rate-limited clients. Option and
//! stock history are load-bearing; their failure aborts the run. Everything
//! downstream degrades per stage, and each skipped stage is recorded so the
//! caller can say exactly what was left out and why.

use serde::Serialize;
use thiserror::Error;
use time::Date;

use crate::indicators::{
    analyze_divergence, analyze_vix, analyze_volatility_skew, augment, compute_rsi,
    realized_volatility, DivergenceReport, VixReport, VolatilitySkewReport,
    DEFAULT_RSI_PERIOD, DEFAULT_VOLATILITY_WINDOW,
};
use crate::metrics::{compute_metrics, SeriesMetrics, DEFAULT_RISK_FREE_RATE};
use crate::providers::{IndexClient, PolygonClient, VIX_SYMBOL};
use crate::{FetchError, OptionContract, PriceSeries, Symbol};

/// Pipeline stage names used in skip reasons and abort errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    OptionBars,
    StockBars,
    VixBars,
    ImpliedVolatility,
    RealizedVolatility,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OptionBars => "option bars",
            Self::StockBars => "stock bars",
            Self::VixBars => "vix bars",
            Self::ImpliedVolatility => "implied volatility",
            Self::RealizedVolatility => "realized volatility",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage the run survived without, and why it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedStage {
    pub stage: Stage,
    pub reason: String,
}

/// Fatal orchestration failure: one of the load-bearing fetches died.
#[derive(Debug, Error)]
#[error("{stage} fetch failed: {source}")]
pub struct AnalysisError {
    pub stage: Stage,
    #[source]
    pub source: FetchError,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub option_series: PriceSeries,
    pub stock_series: PriceSeries,
    pub divergence: DivergenceReport,
    pub skew: Option<VolatilitySkewReport>,
    pub vix: Option<VixReport>,
    pub option_metrics: Option<SeriesMetrics>,
    pub stock_metrics: Option<SeriesMetrics>,
    pub skipped: Vec<SkippedStage>,
}

/// Sequences fetch, indicator computation, and interpretation.
#[derive(Clone)]
pub struct Analyzer {
    polygon: PolygonClient,
    index: IndexClient,
    rsi_period: usize,
    risk_free_rate: f64,
}

impl Analyzer {
    pub fn new(polygon: PolygonClient, index: IndexClient) -> Self {
        Self {
            polygon,
            index,
            rsi_period: DEFAULT_RSI_PERIOD,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }

    pub fn with_rsi_period(mut self, rsi_period: usize) -> Self {
        self.rsi_period = rsi_period;
        self
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Run the full pipeline for one contract over a date range.
    pub async fn run(
        &self,
        contract: &OptionContract,
        from: Date,
        to: Date,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let mut skipped = Vec::new();

        let occ = contract.occ_symbol();
        let mut option_series = self
            .polygon
            .fetch_aggregates(&occ, from, to)
            .await
            .map_err(|source| AnalysisError {
                stage: Stage::OptionBars,
                source,
            })?;

        let mut stock_series = self
            .index
            .fetch_daily(&contract.underlying, from, to)
            .await
            .map_err(|source| AnalysisError {
                stage: Stage::StockBars,
                source,
            })?;

        let vix_symbol = Symbol::parse(VIX_SYMBOL).expect("vix ticker is valid");
        let vix_series = match self.index.fetch_daily(&vix_symbol, from, to).await {
            Ok(series) => Some(series),
            Err(error) => {
                tracing::warn!(%error, "continuing without VIX data");
                skipped.push(SkippedStage {
                    stage: Stage::VixBars,
                    reason: error.to_string(),
                });
                None
            }
        };

        compute_rsi(&mut option_series, self.rsi_period);
        compute_rsi(&mut stock_series, self.rsi_period);
        augment(&mut option_series);
        augment(&mut stock_series);

        let divergence = analyze_divergence(&option_series, &stock_series);

        let skew = match self.polygon.fetch_implied_volatility(contract).await {
            Ok(Some(implied)) => {
                match realized_volatility(&option_series, DEFAULT_VOLATILITY_WINDOW, true) {
                    Some(realized) => Some(analyze_volatility_skew(implied, realized)),
                    None => {
                        skipped.push(SkippedStage {
                            stage: Stage::RealizedVolatility,
                            reason: String::from("option series too short for realized volatility"),
                        });
                        None
                    }
                }
            }
            Ok(None) => {
                skipped.push(SkippedStage {
                    stage: Stage::ImpliedVolatility,
                    reason: String::from("snapshot does not carry implied volatility"),
                });
                None
            }
            Err(error) => {
                tracing::warn!(%error, "continuing without implied volatility");
                skipped.push(SkippedStage {
                    stage: Stage::ImpliedVolatility,
                    reason: error.to_string(),
                });
                None
            }
        };

        let vix = vix_series.as_ref().map(analyze_vix);

        let option_metrics = compute_metrics(&option_series, self.risk_free_rate);
        let stock_metrics = compute_metrics(&stock_series, self.risk_free_rate);

        Ok(AnalysisOutcome {
            option_series,
            stock_series,
            divergence,
            skew,
            vix,
            option_metrics,
            stock_metrics,
            skipped,
        })
    }
}
