//! # Voltick Core
//!
//! Market-data access and option indicator pipeline for voltick.
//!
//! ## Overview
//!
//! This crate provides the moving parts behind the `voltick` CLI:
//!
//! - **Canonical domain models** for bars, price series, and option contracts
//! - **Rate-limited provider clients** with daily quota, pacing, and retry
//! - **TTL response cache** shared by the clients
//! - **Indicator engine** for RSI, realized volatility, divergence,
//!   volatility skew, and VIX regime
//! - **Analysis orchestrator** that sequences the whole run and degrades
//!   per stage
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analysis`] | Orchestrator: fetch, compute, interpret |
//! | [`cache`] | TTL key-to-JSON response cache |
//! | [`domain`] | Domain models (Bar, PriceSeries, OptionContract) |
//! | [`error`] | Error taxonomy |
//! | [`http`] | HTTP transport abstraction |
//! | [`indicators`] | Pure indicator computations |
//! | [`metrics`] | Per-series performance summary |
//! | [`providers`] | Polygon and index-provider clients |
//! | [`quota`] | Daily request quota ledger |
//! | [`retry`] | Backoff schedule and retrying request loop |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use time::macros::date;
//! use voltick_core::{
//!     Analyzer, CacheStore, IndexClient, OptionContract, OptionKind,
//!     PolygonClient, Symbol,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = CacheStore::with_expiry_hours(24);
//!     let polygon = PolygonClient::new("api-key", cache.clone());
//!     let index = IndexClient::new(cache);
//!
//!     let contract = OptionContract::new(
//!         Symbol::parse("AAPL")?,
//!         date!(2025 - 04 - 25),
//!         200.0,
//!         OptionKind::Call,
//!     )?;
//!
//!     let analyzer = Analyzer::new(polygon, index);
//!     let outcome = analyzer
//!         .run(&contract, date!(2025 - 03 - 25), date!(2025 - 04 - 24))
//!         .await?;
//!
//!     println!("divergence: {:?}", outcome.divergence.divergence_type);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fetch operations return [`FetchError`], which separates quota exhaustion,
//! transient upstream failures (retried on a fixed backoff schedule), and
//! permanent failures (surfaced immediately). Indicator shortfalls never
//! error: a series too short for an indicator yields an absent value and a
//! `tracing` warning.
//!
//! ## Security
//!
//! - API keys are injected by the caller and never logged
//! - All requests go through a single transport trait, so offline tests
//!   never touch the network

pub mod analysis;
pub mod cache;
pub mod domain;
pub mod error;
pub mod http;
pub mod indicators;
pub mod metrics;
pub mod providers;
pub mod quota;
pub mod retry;

// Re-export commonly used types at the crate root.

pub use analysis::{AnalysisError, AnalysisOutcome, Analyzer, SkippedStage, Stage};
pub use cache::CacheStore;
pub use domain::{Bar, OptionContract, OptionKind, PricePoint, PriceSeries, Signal, Symbol};
pub use error::{FetchError, ValidationError};
pub use http::{HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use indicators::{
    DivergenceKind, DivergenceReport, SkewKind, VixLevel, VixReport, VixTrend,
    VolatilitySkewReport,
};
pub use metrics::{interpret_option_sharpe, interpret_sharpe, SeriesMetrics};
pub use providers::{IndexClient, OptionSnapshot, PolygonClient, VIX_SYMBOL};
pub use quota::{Clock, ManualClock, QuotaLedger, SystemClock};
pub use retry::{Backoff, RetryConfig};
