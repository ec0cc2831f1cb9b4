//! Per-series performance summary.

use serde::Serialize;

use crate::indicators::TRADING_DAYS_PER_YEAR;
use crate::{PriceSeries, Signal};

/// Annual risk-free rate used when the caller does not supply one.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0434;

/// Return and risk summary for one price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesMetrics {
    pub sharpe_ratio: f64,
    /// Mean daily return, in percent.
    pub avg_return_pct: f64,
    /// Daily return standard deviation, in percent.
    pub std_dev_pct: f64,
    /// Whole-period return, in percent.
    pub total_return_pct: f64,
    pub rsi: Option<f64>,
    pub signal: Option<Signal>,
}

/// Compute summary metrics; `None` when the series has fewer than two bars.
pub fn compute_metrics(series: &PriceSeries, risk_free_rate: f64) -> Option<SeriesMetrics> {
    let closes: Vec<f64> = series.closes().collect();
    if closes.len() < 2 {
        tracing::warn!(symbol = %series.symbol, bars = closes.len(), "series too short for metrics");
        return None;
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect();
    if returns.is_empty() {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let std_dev = if returns.len() > 1 {
        crate::indicators::sample_std_dev(&returns)
    } else {
        0.0
    };

    let daily_rf = (1.0 + risk_free_rate).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let excess_mean = excess.iter().sum::<f64>() / excess.len() as f64;
    let excess_std = if excess.len() > 1 {
        crate::indicators::sample_std_dev(&excess)
    } else {
        0.0
    };
    let sharpe_ratio = if excess_std > 0.0 {
        TRADING_DAYS_PER_YEAR.sqrt() * excess_mean / excess_std
    } else {
        0.0
    };

    let total_return_pct = (closes[closes.len() - 1] / closes[0] - 1.0) * 100.0;

    Some(SeriesMetrics {
        sharpe_ratio,
        avg_return_pct: mean * 100.0,
        std_dev_pct: std_dev * 100.0,
        total_return_pct,
        rsi: series.latest_rsi(),
        signal: series.latest_signal(),
    })
}

/// Rate a stock Sharpe ratio against market benchmarks.
pub fn interpret_sharpe(sharpe_ratio: f64) -> (&'static str, &'static str) {
    if sharpe_ratio <= 0.0 {
        ("Poor", "Returns are worse than the risk-free rate")
    } else if sharpe_ratio < 0.3 {
        ("Below Average", "Returns trail typical market performance")
    } else if sharpe_ratio < 0.5 {
        ("Average", "Returns are in line with broad market indices")
    } else if sharpe_ratio < 0.7 {
        ("Good", "Above-market returns with reasonable risk")
    } else if sharpe_ratio < 1.0 {
        ("Very Good", "Strong risk-adjusted returns")
    } else {
        ("Excellent", "Exceptional risk-adjusted performance; verify sustainability")
    }
}

/// Rate an option Sharpe ratio. Options lean on leverage and decay, so the
/// bands sit far wider than the stock ones.
pub fn interpret_option_sharpe(sharpe_ratio: f64) -> (&'static str, &'static str) {
    if sharpe_ratio <= -2.0 {
        ("Very Poor", "Severe losses, likely time decay plus adverse price movement")
    } else if sharpe_ratio <= -1.0 {
        ("Poor", "Significant losses, common for out-of-money options near expiry")
    } else if sharpe_ratio < 0.0 {
        ("Below Average", "Negative returns, typical of time-decay drag")
    } else if sharpe_ratio < 1.0 {
        ("Neutral", "Positive but volatile returns")
    } else if sharpe_ratio < 2.0 {
        ("Good", "Strong performance given option volatility")
    } else if sharpe_ratio < 3.0 {
        ("Very Good", "Excellent risk-adjusted returns for an option")
    } else {
        ("Outstanding", "Exceptional performance; verify it is not a data anomaly")
    }
}
