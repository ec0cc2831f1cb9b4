use serde::Serialize;

use crate::PriceSeries;

/// RSI-point gap that separates noise from divergence (strict `>`).
pub const SIGNIFICANT_RSI_GAP: f64 = 10.0;

/// Direction of an option-vs-stock RSI divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    Bullish,
    Bearish,
    None,
    Error,
}

impl DivergenceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::None => "none",
            Self::Error => "error",
        }
    }
}

/// RSI divergence between an option and its underlying stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergenceReport {
    pub option_rsi: Option<f64>,
    pub stock_rsi: Option<f64>,
    pub rsi_difference: Option<f64>,
    pub divergence_type: DivergenceKind,
    pub interpretation: String,
    pub buying_strategies: Vec<String>,
    pub selling_strategies: Vec<String>,
}

/// Compare the latest RSI of both series.
///
/// `difference = option_rsi - stock_rsi`; a gap above +10 means options
/// traders are running ahead of the stock (bearish), below -10 behind it
/// (bullish). A missing RSI on either side yields an error report rather
/// than a panic.
pub fn analyze_divergence(
    option_series: &PriceSeries,
    stock_series: &PriceSeries,
) -> DivergenceReport {
    let (Some(option_rsi), Some(stock_rsi)) =
        (option_series.latest_rsi(), stock_series.latest_rsi())
    else {
        tracing::warn!(
            option = %option_series.symbol,
            stock = %stock_series.symbol,
            "divergence analysis requires RSI on both series"
        );
        return report(None, None, None, DivergenceKind::Error);
    };

    divergence_from_rsi(option_rsi, stock_rsi)
}

/// Classify a pair of already-computed RSI values.
pub fn divergence_from_rsi(option_rsi: f64, stock_rsi: f64) -> DivergenceReport {
    let difference = option_rsi - stock_rsi;
    let kind = if difference.abs() > SIGNIFICANT_RSI_GAP {
        if difference > 0.0 {
            DivergenceKind::Bearish
        } else {
            DivergenceKind::Bullish
        }
    } else {
        DivergenceKind::None
    };

    report(Some(option_rsi), Some(stock_rsi), Some(difference), kind)
}

fn report(
    option_rsi: Option<f64>,
    stock_rsi: Option<f64>,
    difference: Option<f64>,
    kind: DivergenceKind,
) -> DivergenceReport {
    let (interpretation, buying, selling) = divergence_texts(kind);
    DivergenceReport {
        option_rsi,
        stock_rsi,
        rsi_difference: difference,
        divergence_type: kind,
        interpretation: interpretation.to_owned(),
        buying_strategies: buying.iter().map(|s| (*s).to_owned()).collect(),
        selling_strategies: selling.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Fixed text bank keyed by classification.
fn divergence_texts(
    kind: DivergenceKind,
) -> (&'static str, &'static [&'static str], &'static [&'static str]) {
    match kind {
        DivergenceKind::Bearish => (
            "Bearish divergence: options traders are more bullish than stock traders, which may indicate overoptimism in the options market despite stock weakness",
            &["Buy puts if you believe the stock will continue to fall"],
            &[
                "Sell calls if you believe the stock will remain below the strike price",
                "Write cash-secured puts if you want to potentially buy the stock at a lower price",
            ],
        ),
        DivergenceKind::Bullish => (
            "Bullish divergence: options traders are more bearish than stock traders, which may indicate undervaluation of options relative to stock strength",
            &["Buy calls if you believe the stock will continue to rise"],
            &[
                "Sell puts if you believe the stock will remain above the strike price",
                "Write covered calls if you own the stock and want to generate income",
            ],
        ),
        DivergenceKind::None => ("No significant divergence detected", &[], &[]),
        DivergenceKind::Error => ("Divergence could not be analyzed", &[], &[]),
    }
}
