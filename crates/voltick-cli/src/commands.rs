//! Command dispatch.

use std::process::ExitCode;

use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};
use voltick_core::{Analyzer, CacheStore, IndexClient, OptionContract, PolygonClient, Symbol};

use crate::cli::{AnalyzeArgs, Cli, Command};
use crate::credentials::resolve_api_key;
use crate::error::CliError;
use crate::output;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Command::Analyze(args) => analyze(cli, args).await,
    }
}

async fn analyze(cli: &Cli, args: &AnalyzeArgs) -> Result<ExitCode, CliError> {
    let contract = build_contract(args)?;
    let api_key = resolve_api_key(args.api_key.as_deref())?;

    let cache = if args.cache_hours == 0 {
        CacheStore::disabled()
    } else {
        CacheStore::with_expiry_hours(args.cache_hours)
    };
    let polygon = PolygonClient::new(api_key, cache.clone());
    let index = IndexClient::new(cache);
    let analyzer =
        Analyzer::new(polygon, index).with_risk_free_rate(args.risk_free_rate);

    let to = OffsetDateTime::now_utc().date();
    let from = to - Duration::days(i64::from(args.days_back));

    tracing::info!(contract = %contract, %from, %to, "starting analysis");
    let outcome = analyzer.run(&contract, from, to).await?;

    output::render(&outcome, &contract, from, to, cli.format, cli.pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn build_contract(args: &AnalyzeArgs) -> Result<OptionContract, CliError> {
    let expiry_format = format_description!("[year]-[month]-[day]");
    let expiry = Date::parse(&args.expiry, &expiry_format).map_err(|_| {
        CliError::InvalidArgument(format!(
            "expiry '{}' is not a YYYY-MM-DD date",
            args.expiry
        ))
    })?;

    let underlying = Symbol::parse(&args.ticker)?;
    Ok(OptionContract::new(
        underlying,
        expiry,
        args.strike,
        args.kind.into(),
    )?)
}
