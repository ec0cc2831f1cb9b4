use serde::Serialize;

use crate::PriceSeries;

/// Closes inspected for the trend check.
const TREND_WINDOW: usize = 5;

/// Market-fear regime from the latest VIX close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VixLevel {
    Low,
    Normal,
    Elevated,
    Extreme,
    Unknown,
    Error,
}

impl VixLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::Extreme => "extreme",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }
}

/// Direction of the last five VIX closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VixTrend {
    Rising,
    Falling,
    Neutral,
    Unknown,
}

impl VixTrend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Neutral => "neutral",
            Self::Unknown => "unknown",
        }
    }
}

/// VIX regime snapshot for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VixReport {
    pub current_vix: Option<f64>,
    pub vix_level: VixLevel,
    pub vix_trend: VixTrend,
    pub interpretation: String,
    pub trading_implications: Vec<String>,
}

/// Classify the VIX regime from a daily series.
///
/// Level bounds are half-open: `< 15` low, `[15, 25)` normal, `[25, 30)`
/// elevated, `>= 30` extreme. The trend looks at the last five closes and
/// is skipped below five bars. A fully flat window satisfies both
/// monotonicity checks; rising is checked first and wins the tie.
pub fn analyze_vix(series: &PriceSeries) -> VixReport {
    let Some(current) = series.latest_close() else {
        tracing::warn!("vix series is empty");
        return VixReport {
            current_vix: None,
            vix_level: VixLevel::Error,
            vix_trend: VixTrend::Unknown,
            interpretation: String::from("VIX data was not available"),
            trading_implications: Vec::new(),
        };
    };

    let level = classify_level(current);
    let (base_interpretation, implications) = level_texts(level);
    let mut interpretation = base_interpretation.to_owned();
    let mut trading_implications: Vec<String> =
        implications.iter().map(|s| (*s).to_owned()).collect();

    let closes: Vec<f64> = series.closes().collect();
    let trend = classify_trend(&closes);
    match trend {
        VixTrend::Rising => {
            interpretation.push_str(
                " The VIX has risen over the last five sessions, signaling growing market uncertainty.",
            );
            trading_implications.push(String::from(
                "Rising VIX: favor defensive positioning and tighter risk limits",
            ));
        }
        VixTrend::Falling => {
            interpretation.push_str(
                " The VIX has fallen over the last five sessions, signaling receding market uncertainty.",
            );
            trading_implications.push(String::from(
                "Falling VIX: decreasing uncertainty opens room for more aggressive strategies",
            ));
        }
        VixTrend::Neutral | VixTrend::Unknown => {}
    }

    VixReport {
        current_vix: Some(current),
        vix_level: level,
        vix_trend: trend,
        interpretation,
        trading_implications,
    }
}

fn classify_level(vix: f64) -> VixLevel {
    if !vix.is_finite() {
        VixLevel::Unknown
    } else if vix < 15.0 {
        VixLevel::Low
    } else if vix < 25.0 {
        VixLevel::Normal
    } else if vix < 30.0 {
        VixLevel::Elevated
    } else {
        VixLevel::Extreme
    }
}

fn classify_trend(closes: &[f64]) -> VixTrend {
    if closes.len() < TREND_WINDOW {
        return VixTrend::Unknown;
    }

    let window = &closes[closes.len() - TREND_WINDOW..];
    let non_decreasing = window.windows(2).all(|pair| pair[1] >= pair[0]);
    if non_decreasing {
        return VixTrend::Rising;
    }
    let non_increasing = window.windows(2).all(|pair| pair[1] <= pair[0]);
    if non_increasing {
        return VixTrend::Falling;
    }
    VixTrend::Neutral
}

/// Fixed text bank keyed by regime.
fn level_texts(level: VixLevel) -> (&'static str, &'static [&'static str]) {
    match level {
        VixLevel::Low => (
            "VIX is low: the market is calm with little fear priced in.",
            &[
                "Favorable environment for premium-selling strategies",
                "Option protection is relatively cheap to buy",
            ],
        ),
        VixLevel::Normal => (
            "VIX is in its normal band: balanced market with moderate volatility expectations.",
            &["Balanced environment for both buying and selling strategies"],
        ),
        VixLevel::Elevated => (
            "VIX is elevated: fear is building and a market correction may be ahead.",
            &[
                "Consider defensive positioning",
                "Premium selling pays more but carries elevated risk",
            ],
        ),
        VixLevel::Extreme => (
            "VIX is extreme: high fear, typical of market panics or corrections.",
            &[
                "Option premiums are rich; selling carries severe tail risk",
                "Consider reducing position sizes until volatility subsides",
            ],
        ),
        VixLevel::Unknown | VixLevel::Error => ("VIX regime could not be determined.", &[]),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::Date;

    use crate::{Bar, Symbol};

    use super::*;

    fn vix_series(closes: &[f64]) -> PriceSeries {
        let start = date!(2025 - 01 - 02);
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = Date::from_julian_day(start.to_julian_day() + i as i32)
                    .expect("valid date");
                Bar::new(date, close, close, close, close, 0).expect("valid bar")
            })
            .collect();
        PriceSeries::from_bars(Symbol::parse("^VIX").expect("valid"), bars).expect("valid series")
    }

    #[test]
    fn level_boundaries_are_half_open() {
        let cases = [
            (14.999, VixLevel::Low),
            (15.0, VixLevel::Normal),
            (24.999, VixLevel::Normal),
            (25.0, VixLevel::Elevated),
            (29.999, VixLevel::Elevated),
            (30.0, VixLevel::Extreme),
        ];
        for (vix, expected) in cases {
            assert_eq!(classify_level(vix), expected, "vix={vix}");
        }
    }

    #[test]
    fn rising_run_appends_cautionary_implication() {
        let report = analyze_vix(&vix_series(&[16.0, 17.0, 18.0, 19.0, 20.0]));
        assert_eq!(report.vix_trend, VixTrend::Rising);
        assert!(report.interpretation.contains("risen over the last five sessions"));
        assert!(report
            .trading_implications
            .iter()
            .any(|i| i.starts_with("Rising VIX")));
    }

    #[test]
    fn falling_run_appends_opportunity_implication() {
        let report = analyze_vix(&vix_series(&[20.0, 19.0, 18.0, 17.0, 16.0]));
        assert_eq!(report.vix_trend, VixTrend::Falling);
        assert!(report
            .trading_implications
            .iter()
            .any(|i| i.starts_with("Falling VIX")));
    }

    #[test]
    fn flat_window_ties_break_toward_rising() {
        let report = analyze_vix(&vix_series(&[18.0; 6]));
        assert_eq!(report.vix_trend, VixTrend::Rising);
    }

    #[test]
    fn mixed_window_is_neutral() {
        let report = analyze_vix(&vix_series(&[18.0, 19.0, 17.0, 20.0, 18.5]));
        assert_eq!(report.vix_trend, VixTrend::Neutral);
        assert_eq!(report.trading_implications.len(), 1);
    }

    #[test]
    fn short_series_skips_the_trend_check() {
        let report = analyze_vix(&vix_series(&[18.0, 19.0]));
        assert_eq!(report.vix_trend, VixTrend::Unknown);
        assert_eq!(report.vix_level, VixLevel::Normal);
    }

    #[test]
    fn empty_series_is_an_error_report() {
        let series = PriceSeries::from_bars(Symbol::parse("^VIX").expect("valid"), Vec::new())
            .expect("empty series is valid");
        let report = analyze_vix(&series);
        assert_eq!(report.vix_level, VixLevel::Error);
        assert_eq!(report.current_vix, None);
    }
}
