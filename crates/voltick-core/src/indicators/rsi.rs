use crate::{PriceSeries, Signal};

/// Standard RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

const OVERBOUGHT_THRESHOLD: f64 = 70.0;
const OVERSOLD_THRESHOLD: f64 = 30.0;

/// Fill the `rsi` and `signal` columns of a series in place.
///
/// Average gain/loss is a simple rolling mean over `period` consecutive
/// deltas, so the first `period` bars carry no value (a delta needs a
/// predecessor, and the window needs to fill). Zero-division convention:
/// RSI is 100 when the window has gains and no losses, 50 when it is flat.
pub fn compute_rsi(series: &mut PriceSeries, period: usize) {
    let closes: Vec<f64> = series.closes().collect();
    if period == 0 || closes.len() <= period {
        tracing::warn!(
            symbol = %series.symbol,
            bars = closes.len(),
            period,
            "series too short for RSI"
        );
        return;
    }

    // deltas[k] is the move into bar k+1.
    let deltas: Vec<(f64, f64)> = closes
        .windows(2)
        .map(|pair| {
            let delta = pair[1] - pair[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .collect();

    let mut gain_sum: f64 = deltas[..period].iter().map(|d| d.0).sum();
    let mut loss_sum: f64 = deltas[..period].iter().map(|d| d.1).sum();

    let points = series.points_mut();
    for i in period..closes.len() {
        if i > period {
            let (old_gain, old_loss) = deltas[i - period - 1];
            let (new_gain, new_loss) = deltas[i - 1];
            gain_sum += new_gain - old_gain;
            loss_sum += new_loss - old_loss;
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;
        let rsi = rsi_value(avg_gain, avg_loss);

        points[i].rsi = Some(rsi);
        points[i].signal = Some(signal_for(rsi));
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            50.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

fn signal_for(rsi: f64) -> Signal {
    if rsi > OVERBOUGHT_THRESHOLD {
        Signal::Overbought
    } else if rsi < OVERSOLD_THRESHOLD {
        Signal::Oversold
    } else {
        Signal::Neutral
    }
}

/// Fill the `price_delta` and `daily_return` columns in place.
///
/// Series with fewer than two bars are left untouched; that is a degraded
/// outcome, not an error.
pub fn augment(series: &mut PriceSeries) {
    let closes: Vec<f64> = series.closes().collect();
    if closes.len() < 2 {
        tracing::warn!(
            symbol = %series.symbol,
            bars = closes.len(),
            "series too short for per-bar augmentation"
        );
        return;
    }

    let first = closes[0];
    let points = series.points_mut();
    for (i, point) in points.iter_mut().enumerate() {
        point.price_delta = Some(closes[i] - first);
        if i > 0 && closes[i - 1] != 0.0 {
            point.daily_return = Some(closes[i] / closes[i - 1] - 1.0);
        }
    }
}
