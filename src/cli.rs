//! Command-line front end for the rollup engine.
//!
//! Stands in for the original system's messaging front end: it accepts a
//! query (either as flags or as a `{from, to, group_type}` request file),
//! reads records from a JSON file, and prints the `{dataset, labels}`
//! response. Validation failures are reported as a structured JSON error on
//! stderr and never reach the engine.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::Parser;

use crate::request::{self, AggregateRequest, AggregateResponse};
use crate::rollup;
use crate::source::JsonFileSource;

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, INSTANT_FORMAT)
        .map_err(|e| format!("expected an instant like 2024-01-01T00:00:00: {e}"))
}

#[derive(Parser, Debug)]
#[command(
    name = "gapfill",
    version,
    about = "Gap-filled time-series sums over timestamped records"
)]
pub struct Cli {
    /// JSON file holding an array of {"dt": ..., "value": ...} records.
    #[arg(long, value_name = "FILE", env = "GAPFILL_RECORDS")]
    pub records: PathBuf,

    /// Inclusive range start, e.g. 2024-01-01T00:00:00.
    #[arg(
        long,
        value_parser = parse_instant,
        required_unless_present = "request",
        conflicts_with = "request"
    )]
    pub from: Option<NaiveDateTime>,

    /// Inclusive range end.
    #[arg(
        long,
        value_parser = parse_instant,
        required_unless_present = "request",
        conflicts_with = "request"
    )]
    pub to: Option<NaiveDateTime>,

    /// Bucket granularity: hour, day, week, or month.
    #[arg(
        long = "group-by",
        value_name = "GRANULARITY",
        required_unless_present = "request",
        conflicts_with = "request"
    )]
    pub group_by: Option<String>,

    /// Read the whole {from, to, group_type} request from a JSON file
    /// instead of flags.
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Pretty-print the response JSON.
    #[arg(long)]
    pub pretty: bool,
}

/// Install the tracing subscriber: `RUST_LOG` filter, events on stderr so
/// stdout stays clean for the response JSON.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute one aggregation run.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let request = build_request(&cli)?;

    let query = match request.into_query() {
        Ok(query) => query,
        Err(err) => {
            eprintln!("{}", request::error_body(&err));
            return Err(err.into());
        }
    };

    let source = JsonFileSource::from_path(&cli.records)
        .with_context(|| format!("loading records from `{}`", cli.records.display()))?;
    tracing::debug!(
        path = %cli.records.display(),
        records = source.len(),
        "loaded records file"
    );

    let series = match rollup::aggregate(&query, &source) {
        Ok(series) => series,
        Err(err) => {
            eprintln!("{}", request::error_body(&err));
            return Err(err.into());
        }
    };

    let response = AggregateResponse::from(series);
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{rendered}");
    Ok(())
}

fn build_request(cli: &Cli) -> anyhow::Result<AggregateRequest> {
    if let Some(path) = &cli.request {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading request file `{}`", path.display()))?;
        return match serde_json::from_str::<AggregateRequest>(&raw) {
            Ok(request) => Ok(request),
            Err(err) => {
                // Malformed requests get the same structured treatment as
                // validation failures: a JSON error object, not a parse trace.
                let body = serde_json::json!({
                    "error": {
                        "kind": "malformed_request",
                        "message": err.to_string(),
                    }
                });
                eprintln!("{body}");
                anyhow::bail!("malformed request in `{}`", path.display())
            }
        };
    }

    // clap enforces presence when --request is absent; the context messages
    // are a guard against that wiring changing.
    let from = cli.from.context("--from is required without --request")?;
    let to = cli.to.context("--to is required without --request")?;
    let group_type = cli
        .group_by
        .clone()
        .context("--group-by is required without --request")?;
    Ok(AggregateRequest {
        from,
        to,
        group_type,
    })
}
