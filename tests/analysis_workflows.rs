//! End-to-end orchestrator behavior over scripted transports.

use std::sync::Arc;

use time::macros::date;
use voltick_core::{
    Analyzer, CacheStore, DivergenceKind, HttpResponse, IndexClient, OptionContract, OptionKind,
    PolygonClient, QuotaLedger, Signal, SkewKind, Stage, Symbol, VixTrend,
};
use voltick_tests::{
    chart_body, polygon_aggs_body, polygon_snapshot_body, ScriptedHttpClient,
};

const FROM: time::Date = date!(2024 - 01 - 02);
const TO: time::Date = date!(2024 - 01 - 31);

fn contract() -> OptionContract {
    OptionContract::new(
        Symbol::parse("AAPL").expect("valid"),
        date!(2025 - 04 - 25),
        200.0,
        OptionKind::Call,
    )
    .expect("valid contract")
}

fn rising_closes() -> Vec<f64> {
    (0..15).map(|i| 100.0 + 2.0 * i as f64).collect()
}

fn analyzer_with(
    polygon_script: Vec<HttpResponse>,
    index_script: Vec<HttpResponse>,
) -> Analyzer {
    let cache = CacheStore::disabled();
    let polygon = PolygonClient::new("test-key", cache.clone())
        .with_http_client(ScriptedHttpClient::with_responses(polygon_script));
    let index = IndexClient::new(cache)
        .with_http_client(ScriptedHttpClient::with_responses(index_script));
    Analyzer::new(polygon, index)
}

#[tokio::test(start_paused = true)]
async fn rising_option_against_flat_stock_reports_bearish_divergence() {
    let analyzer = analyzer_with(
        vec![
            HttpResponse::ok_json(polygon_aggs_body(&rising_closes())),
            HttpResponse::ok_json(polygon_snapshot_body(Some(45.0))),
        ],
        vec![
            HttpResponse::ok_json(chart_body(&[50.0; 15])),
            HttpResponse::ok_json(chart_body(&[16.0, 17.0, 18.0, 19.0, 20.0])),
        ],
    );

    let outcome = analyzer
        .run(&contract(), FROM, TO)
        .await
        .expect("run succeeds");

    // Option: every delta is a gain, so RSI saturates at 100.
    assert_eq!(outcome.option_series.latest_rsi(), Some(100.0));
    assert_eq!(outcome.option_series.latest_signal(), Some(Signal::Overbought));

    // Stock: flat closes land on the both-zero convention.
    assert_eq!(outcome.stock_series.latest_rsi(), Some(50.0));
    assert_eq!(outcome.stock_series.latest_signal(), Some(Signal::Neutral));

    assert_eq!(outcome.divergence.divergence_type, DivergenceKind::Bearish);
    assert_eq!(outcome.divergence.rsi_difference, Some(50.0));
    assert!(outcome
        .divergence
        .interpretation
        .starts_with("Bearish divergence"));
    assert!(!outcome.divergence.selling_strategies.is_empty());

    // Implied 45% dwarfs the realized volatility of a near-linear ramp.
    let skew = outcome.skew.expect("skew present");
    assert_eq!(skew.implied_volatility, 0.45);
    assert_eq!(skew.skew_type, SkewKind::Positive);

    let vix = outcome.vix.expect("vix present");
    assert_eq!(vix.vix_trend, VixTrend::Rising);

    assert!(outcome.skipped.is_empty());
    assert!(outcome.option_metrics.is_some());
    assert!(outcome.stock_metrics.is_some());
}

#[tokio::test(start_paused = true)]
async fn option_fetch_failure_aborts_the_run() {
    let analyzer = analyzer_with(
        vec![HttpResponse::with_status(404, "no contract")],
        Vec::new(),
    );

    let err = analyzer
        .run(&contract(), FROM, TO)
        .await
        .expect_err("must abort");
    assert_eq!(err.stage, Stage::OptionBars);
}

#[tokio::test(start_paused = true)]
async fn stock_fetch_failure_aborts_the_run() {
    let analyzer = analyzer_with(
        vec![HttpResponse::ok_json(polygon_aggs_body(&rising_closes()))],
        vec![HttpResponse::with_status(404, "unknown ticker")],
    );

    let err = analyzer
        .run(&contract(), FROM, TO)
        .await
        .expect_err("must abort");
    assert_eq!(err.stage, Stage::StockBars);
}

#[tokio::test(start_paused = true)]
async fn vix_fetch_failure_only_degrades_the_run() {
    let analyzer = analyzer_with(
        vec![
            HttpResponse::ok_json(polygon_aggs_body(&rising_closes())),
            HttpResponse::ok_json(polygon_snapshot_body(Some(45.0))),
        ],
        vec![
            HttpResponse::ok_json(chart_body(&[50.0; 15])),
            HttpResponse::with_status(404, "vix endpoint down"),
        ],
    );

    let outcome = analyzer
        .run(&contract(), FROM, TO)
        .await
        .expect("degraded run still succeeds");

    assert!(outcome.vix.is_none());
    assert!(outcome
        .skipped
        .iter()
        .any(|skipped| skipped.stage == Stage::VixBars));
    assert_eq!(outcome.divergence.divergence_type, DivergenceKind::Bearish);
}

#[tokio::test(start_paused = true)]
async fn missing_implied_volatility_skips_the_skew_report() {
    let analyzer = analyzer_with(
        vec![
            HttpResponse::ok_json(polygon_aggs_body(&rising_closes())),
            HttpResponse::ok_json(polygon_snapshot_body(None)),
        ],
        vec![
            HttpResponse::ok_json(chart_body(&[50.0; 15])),
            HttpResponse::ok_json(chart_body(&[16.0, 17.0, 18.0, 19.0, 20.0])),
        ],
    );

    let outcome = analyzer
        .run(&contract(), FROM, TO)
        .await
        .expect("run succeeds");

    assert!(outcome.skew.is_none());
    let skipped = outcome
        .skipped
        .iter()
        .find(|skipped| skipped.stage == Stage::ImpliedVolatility)
        .expect("implied volatility recorded as skipped");
    assert!(skipped.reason.contains("implied volatility"));
}

#[tokio::test(start_paused = true)]
async fn single_bar_option_series_degrades_without_aborting() {
    let analyzer = analyzer_with(
        vec![
            HttpResponse::ok_json(polygon_aggs_body(&[100.0])),
            HttpResponse::ok_json(polygon_snapshot_body(Some(45.0))),
        ],
        vec![
            HttpResponse::ok_json(chart_body(&[50.0; 15])),
            HttpResponse::ok_json(chart_body(&[16.0, 17.0, 18.0, 19.0, 20.0])),
        ],
    );

    let outcome = analyzer
        .run(&contract(), FROM, TO)
        .await
        .expect("short series is not fatal");

    // Too short for RSI on the option side: divergence degrades to error.
    assert_eq!(outcome.divergence.divergence_type, DivergenceKind::Error);
    assert!(outcome.skew.is_none());
    assert!(outcome
        .skipped
        .iter()
        .any(|skipped| skipped.stage == Stage::RealizedVolatility));
    assert!(outcome.option_metrics.is_none());
}

#[tokio::test(start_paused = true)]
async fn cached_aggregates_never_touch_the_network_twice() {
    let cache = CacheStore::with_expiry_hours(24);
    // One scripted response; a second network call would panic.
    let polygon = PolygonClient::new("test-key", cache)
        .with_http_client(ScriptedHttpClient::with_responses(vec![
            HttpResponse::ok_json(polygon_aggs_body(&rising_closes())),
        ]))
        .with_quota(QuotaLedger::with_system_clock());
    let symbol = contract().occ_symbol();

    let first = polygon
        .fetch_aggregates(&symbol, FROM, TO)
        .await
        .expect("network fetch");
    let second = polygon
        .fetch_aggregates(&symbol, FROM, TO)
        .await
        .expect("cache fetch");

    assert_eq!(first, second);
}
