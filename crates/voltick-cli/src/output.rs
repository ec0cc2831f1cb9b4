//! Report rendering.

use time::Date;
use voltick_core::{
    interpret_option_sharpe, interpret_sharpe, AnalysisOutcome, DivergenceReport, OptionContract,
    SeriesMetrics, VixReport, VolatilitySkewReport,
};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    outcome: &AnalysisOutcome,
    contract: &OptionContract,
    from: Date,
    to: Date,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => render_json(outcome, pretty),
        OutputFormat::Text => {
            render_text(outcome, contract, from, to);
            Ok(())
        }
    }
}

fn render_json(outcome: &AnalysisOutcome, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(outcome)?
    } else {
        serde_json::to_string(outcome)?
    };
    println!("{rendered}");
    Ok(())
}

fn render_text(outcome: &AnalysisOutcome, contract: &OptionContract, from: Date, to: Date) {
    section("Analysis Details");
    println!("Contract: {contract}");
    println!("Option Symbol: {}", contract.occ_symbol());
    println!("Date Range: {from} to {to}");

    section("Option Analysis");
    render_metrics(outcome.option_metrics.as_ref(), true);

    section("Stock Analysis");
    render_metrics(outcome.stock_metrics.as_ref(), false);

    section("Divergence Analysis");
    render_divergence(&outcome.divergence);

    if let Some(skew) = &outcome.skew {
        section("Volatility Analysis");
        render_skew(skew);
    }

    if let Some(vix) = &outcome.vix {
        section("VIX Analysis");
        render_vix(vix);
    }

    if !outcome.skipped.is_empty() {
        section("Skipped Analyses");
        for skipped in &outcome.skipped {
            println!("- {}: {}", skipped.stage, skipped.reason);
        }
    }
}

fn section(title: &str) {
    println!("\n{title}");
    println!("{}", "=".repeat(50));
}

fn render_metrics(metrics: Option<&SeriesMetrics>, is_option: bool) {
    let Some(metrics) = metrics else {
        println!("Not enough data to compute metrics");
        return;
    };

    let (rating, explanation) = if is_option {
        interpret_option_sharpe(metrics.sharpe_ratio)
    } else {
        interpret_sharpe(metrics.sharpe_ratio)
    };
    println!("Sharpe Ratio: {:.2} ({rating})", metrics.sharpe_ratio);
    println!("  {explanation}");
    println!("Average Daily Return: {:.2}%", metrics.avg_return_pct);
    println!("Daily Return Std Dev: {:.2}%", metrics.std_dev_pct);
    println!("Total Return: {:.2}%", metrics.total_return_pct);

    if let Some(rsi) = metrics.rsi {
        println!("Current RSI: {rsi:.2}");
    }
    if let Some(signal) = metrics.signal {
        println!("Signal: {}", signal.as_str());
    }
}

fn render_divergence(divergence: &DivergenceReport) {
    if let (Some(option_rsi), Some(stock_rsi), Some(difference)) = (
        divergence.option_rsi,
        divergence.stock_rsi,
        divergence.rsi_difference,
    ) {
        println!("Option RSI: {option_rsi:.2}");
        println!("Stock RSI: {stock_rsi:.2}");
        println!("RSI Difference: {difference:.2}");
    }
    println!("Divergence Type: {}", divergence.divergence_type.as_str());
    println!("Interpretation: {}", divergence.interpretation);
    render_strategies("Buying Strategies", &divergence.buying_strategies);
    render_strategies("Selling Strategies", &divergence.selling_strategies);
}

fn render_skew(skew: &VolatilitySkewReport) {
    println!("Implied Volatility: {:.2}%", skew.implied_volatility * 100.0);
    println!("Realized Volatility: {:.2}%", skew.realized_volatility * 100.0);
    println!("Volatility Skew: {:.2}%", skew.skew * 100.0);
    println!("Skew Type: {}", skew.skew_type.as_str());
    println!("Interpretation: {}", skew.interpretation);
    render_strategies("Buying Strategies", &skew.buying_strategies);
    render_strategies("Selling Strategies", &skew.selling_strategies);
}

fn render_vix(vix: &VixReport) {
    if let Some(current) = vix.current_vix {
        println!("Current VIX: {current:.2}");
    }
    println!("VIX Level: {}", vix.vix_level.as_str());
    println!("VIX Trend: {}", vix.vix_trend.as_str());
    println!("Interpretation: {}", vix.interpretation);
    render_strategies("Trading Implications", &vix.trading_implications);
}

fn render_strategies(title: &str, strategies: &[String]) {
    if strategies.is_empty() {
        return;
    }
    println!("{title}:");
    for strategy in strategies {
        println!("  - {strategy}");
    }
}
