use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, ValidationError};

/// Momentum signal derived from a bar's RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Overbought,
    Oversold,
    Neutral,
}

impl Signal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
        }
    }
}

/// Daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }
        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// A bar together with the columns the indicator engine derives for it.
///
/// Derived fields start absent and are filled by `indicators::compute_rsi`
/// and `indicators::augment`; fetch code never populates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(flatten)]
    pub bar: Bar,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_return: Option<f64>,
}

impl From<Bar> for PricePoint {
    fn from(bar: Bar) -> Self {
        Self {
            bar,
            rsi: None,
            signal: None,
            price_delta: None,
            daily_return: None,
        }
    }
}

/// Ordered daily price series for one symbol.
///
/// Bars are sorted on construction and dates must be strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw bars, sorting by date and rejecting
    /// duplicate dates.
    pub fn from_bars(symbol: Symbol, mut bars: Vec<Bar>) -> Result<Self, ValidationError> {
        bars.sort_by_key(|bar| bar.date);
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::DuplicateBarDate { date: pair[1].date });
            }
        }

        Ok(Self {
            symbol,
            points: bars.into_iter().map(PricePoint::from).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [PricePoint] {
        &mut self.points
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.bar.close)
    }

    pub fn first_close(&self) -> Option<f64> {
        self.points.first().map(|point| point.bar.close)
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|point| point.bar.close)
    }

    /// RSI of the most recent bar, when the series is long enough to have one.
    pub fn latest_rsi(&self) -> Option<f64> {
        self.points.last().and_then(|point| point.rsi)
    }

    /// Signal of the most recent bar, when present.
    pub fn latest_signal(&self) -> Option<Signal> {
        self.points.last().and_then(|point| point.signal)
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn bar(date: Date, close: f64) -> Bar {
        Bar::new(date, close, close, close, close, 100).expect("valid bar")
    }

    #[test]
    fn rejects_negative_prices() {
        let err = Bar::new(date!(2025 - 01 - 02), -1.0, 1.0, 0.5, 0.75, 10).expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { field: "open" }));
    }

    #[test]
    fn rejects_high_below_low() {
        let err = Bar::new(date!(2025 - 01 - 02), 1.0, 0.5, 1.0, 1.0, 10).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn sorts_bars_and_rejects_duplicate_dates() {
        let symbol = Symbol::parse("AAPL").expect("valid");
        let bars = vec![bar(date!(2025 - 01 - 03), 2.0), bar(date!(2025 - 01 - 02), 1.0)];
        let series = PriceSeries::from_bars(symbol.clone(), bars).expect("valid series");
        assert_eq!(series.first_close(), Some(1.0));
        assert_eq!(series.latest_close(), Some(2.0));

        let dup = vec![bar(date!(2025 - 01 - 02), 1.0), bar(date!(2025 - 01 - 02), 2.0)];
        let err = PriceSeries::from_bars(symbol, dup).expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateBarDate { .. }));
    }

    #[test]
    fn derived_columns_start_absent() {
        let symbol = Symbol::parse("AAPL").expect("valid");
        let series =
            PriceSeries::from_bars(symbol, vec![bar(date!(2025 - 01 - 02), 1.0)]).expect("valid");
        let point = &series.points()[0];
        assert!(point.rsi.is_none());
        assert!(point.signal.is_none());
        assert!(point.price_delta.is_none());
        assert!(point.daily_return.is_none());
    }
}
