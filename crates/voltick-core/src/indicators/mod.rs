//! Technical indicator engine.
//!
//! Every function here is a pure transformation of its inputs; the only
//! stateful piece of the crate is the quota ledger in [`crate::quota`].

mod divergence;
mod rsi;
mod vix;
mod volatility;

pub use divergence::{
    analyze_divergence, divergence_from_rsi, DivergenceKind, DivergenceReport,
    SIGNIFICANT_RSI_GAP,
};
pub use rsi::{augment, compute_rsi, DEFAULT_RSI_PERIOD};
pub(crate) use volatility::sample_std_dev;
pub use vix::{analyze_vix, VixLevel, VixReport, VixTrend};
pub use volatility::{
    analyze_volatility_skew, realized_volatility, SkewKind, VolatilitySkewReport,
    DEFAULT_VOLATILITY_WINDOW, SIGNIFICANT_SKEW, TRADING_DAYS_PER_YEAR,
};
