use serde::Serialize;

use crate::PriceSeries;

/// Trading days used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default realized-volatility lookback, in bars.
pub const DEFAULT_VOLATILITY_WINDOW: usize = 252;

/// Skew magnitude that separates neutral from a signal (strict `>`).
pub const SIGNIFICANT_SKEW: f64 = 0.05;

/// Realized volatility as a decimal fraction.
///
/// Sample standard deviation of simple daily returns over the most recent
/// `min(window, len)` bars, annualized by `sqrt(252)` on request. Returns
/// `None` (logged) when the series cannot produce two returns.
pub fn realized_volatility(series: &PriceSeries, window: usize, annualize: bool) -> Option<f64> {
    let closes: Vec<f64> = series.closes().collect();
    if closes.len() < 2 {
        tracing::warn!(
            symbol = %series.symbol,
            bars = closes.len(),
            "series too short for realized volatility"
        );
        return None;
    }

    let w = window.clamp(2, closes.len());
    let recent = &closes[closes.len() - w..];
    let returns: Vec<f64> = recent
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect();
    if returns.len() < 2 {
        tracing::warn!(
            symbol = %series.symbol,
            returns = returns.len(),
            "not enough returns for a standard deviation"
        );
        return None;
    }

    let std_dev = sample_std_dev(&returns);
    Some(if annualize {
        std_dev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        std_dev
    })
}

pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt()
}

/// Direction of the implied-vs-realized gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewKind {
    Positive,
    Negative,
    Neutral,
    Error,
}

impl SkewKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Error => "error",
        }
    }
}

/// Implied-vs-realized volatility comparison for one contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilitySkewReport {
    pub implied_volatility: f64,
    pub realized_volatility: f64,
    pub skew: f64,
    pub skew_type: SkewKind,
    pub interpretation: String,
    pub buying_strategies: Vec<String>,
    pub selling_strategies: Vec<String>,
}

/// Compare an option's implied volatility against its own realized
/// volatility. `|skew| > 0.05` (strict) separates a signal from neutral.
pub fn analyze_volatility_skew(implied_vol: f64, realized_vol: f64) -> VolatilitySkewReport {
    if !implied_vol.is_finite() || !realized_vol.is_finite() {
        return report(implied_vol, realized_vol, 0.0, SkewKind::Error);
    }

    let skew = implied_vol - realized_vol;
    let kind = if skew.abs() > SIGNIFICANT_SKEW {
        if skew > 0.0 {
            SkewKind::Positive
        } else {
            SkewKind::Negative
        }
    } else {
        SkewKind::Neutral
    };

    report(implied_vol, realized_vol, skew, kind)
}

fn report(implied: f64, realized: f64, skew: f64, kind: SkewKind) -> VolatilitySkewReport {
    let (interpretation, buying, selling) = skew_texts(kind);
    VolatilitySkewReport {
        implied_volatility: implied,
        realized_volatility: realized,
        skew,
        skew_type: kind,
        interpretation: interpretation.to_owned(),
        buying_strategies: buying.iter().map(|s| (*s).to_owned()).collect(),
        selling_strategies: selling.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Fixed text bank keyed by classification.
fn skew_texts(kind: SkewKind) -> (&'static str, &'static [&'static str], &'static [&'static str]) {
    match kind {
        SkewKind::Positive => (
            "Positive volatility skew: the option is priced with higher volatility than its actual price movements, suggesting it may be overpriced",
            &[],
            &[
                "Sell covered calls if you own the stock",
                "Write cash-secured puts if you want to potentially buy the stock at a lower price",
                "Sell premium through credit spreads",
            ],
        ),
        SkewKind::Negative => (
            "Negative volatility skew: the option is priced with lower volatility than its actual price movements, suggesting it may be underpriced",
            &[
                "Buy calls if you expect the stock to rise",
                "Buy puts if you expect the stock to fall",
                "Consider debit spreads to reduce cost while keeping directional exposure",
            ],
            &[],
        ),
        SkewKind::Neutral => ("No significant volatility skew detected", &[], &[]),
        SkewKind::Error => ("Volatility inputs were not usable", &[], &[]),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::Date;

    use crate::{Bar, Symbol};

    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = date!(2025 - 01 - 02);
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = Date::from_julian_day(start.to_julian_day() + i as i32)
                    .expect("valid date");
                Bar::new(date, close, close, close, close, 100).expect("valid bar")
            })
            .collect();
        PriceSeries::from_bars(Symbol::parse("TEST").expect("valid"), bars).expect("valid series")
    }

    #[test]
    fn flat_series_has_zero_volatility() {
        let s = series(&[10.0; 30]);
        let vol = realized_volatility(&s, DEFAULT_VOLATILITY_WINDOW, true).expect("present");
        assert_eq!(vol, 0.0);
    }

    #[test]
    fn annualization_scales_by_sqrt_252() {
        let s = series(&[100.0, 101.0, 100.0, 102.0, 99.0, 101.0]);
        let daily = realized_volatility(&s, DEFAULT_VOLATILITY_WINDOW, false).expect("present");
        let annual = realized_volatility(&s, DEFAULT_VOLATILITY_WINDOW, true).expect("present");
        assert!((annual - daily * TRADING_DAYS_PER_YEAR.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn window_limits_the_lookback() {
        // The early 100 -> 200 jump sits outside a 3-bar window; the
        // remaining returns are a constant 10%, so the windowed std dev
        // is zero.
        let s = series(&[100.0, 200.0, 110.0, 121.0, 133.1]);
        let vol = realized_volatility(&s, 3, false).expect("present");
        assert!(vol.abs() < 1e-9);
    }

    #[test]
    fn too_short_series_returns_none() {
        let s = series(&[100.0]);
        assert!(realized_volatility(&s, DEFAULT_VOLATILITY_WINDOW, true).is_none());
    }

    #[test]
    fn skew_at_exact_threshold_is_neutral() {
        let report = analyze_volatility_skew(0.30, 0.25);
        assert_eq!(report.skew_type, SkewKind::Neutral);
        assert!(report.buying_strategies.is_empty());
        assert!(report.selling_strategies.is_empty());
    }

    #[test]
    fn skew_just_past_threshold_classifies_by_sign() {
        let positive = analyze_volatility_skew(0.3000001, 0.25);
        assert_eq!(positive.skew_type, SkewKind::Positive);
        assert!(!positive.selling_strategies.is_empty());
        assert!(positive.buying_strategies.is_empty());

        let negative = analyze_volatility_skew(0.25, 0.3000001);
        assert_eq!(negative.skew_type, SkewKind::Negative);
        assert!(!negative.buying_strategies.is_empty());
        assert!(negative.selling_strategies.is_empty());
    }

    #[test]
    fn non_finite_input_is_an_error_report() {
        let report = analyze_volatility_skew(f64::NAN, 0.2);
        assert_eq!(report.skew_type, SkewKind::Error);
    }
}
