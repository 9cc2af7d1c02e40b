//! `slots` CLI: compute bookable meeting slots from a JSON fixture store.
//!
//! ## Usage
//!
//! ```sh
//! # Slots of one event type on one date, rendered in the requester's zone
//! slots availability --store store.json --event-type intro --date 2026-03-16 --tz Europe/Paris
//!
//! # Pin "now" for reproducible output
//! slots availability --store store.json --event-type intro --date 2026-03-16 --now 2026-03-16T07:00:00Z
//!
//! # Dates in the next two weeks that have at least one slot
//! slots scan --store store.json --event-type intro --from 2026-03-16 --days 14
//!
//! # Check an event type definition
//! slots validate -i event_type.json
//! ```
//!
//! Settings come from `slots.toml` (or `--config`) and `SLOTS_*` environment
//! variables; log output goes to stderr and honours `RUST_LOG`.

mod settings;

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::provider::{FixedClock, InMemoryStore};
use slot_engine::{AvailabilityService, EventTypeConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "slots", version, about = "Bookable meeting slot calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file
    #[arg(long, global = true, default_value = "slots.toml")]
    config: PathBuf,

    /// Override the external calendar timeout (milliseconds)
    #[arg(long, global = true)]
    external_timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the slots of one event type on one date
    Availability {
        #[command(flatten)]
        target: Target,
        /// Host-local date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List dates that have at least one slot
    Scan {
        #[command(flatten)]
        target: Target,
        /// First date to check (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Number of consecutive dates to check
        #[arg(long, default_value_t = 14)]
        days: u32,
    },
    /// Validate an event type definition
    Validate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(clap::Args)]
struct Target {
    /// JSON fixture holding event types, bookings and external busy periods
    #[arg(long)]
    store: String,
    /// Event type id
    #[arg(long)]
    event_type: String,
    /// Requester timezone (defaults to the configured one)
    #[arg(long)]
    tz: Option<String>,
    /// Current instant as RFC 3339 (defaults to the system clock)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    event_type_id: &'a str,
    timezone: &'a str,
    dates: Vec<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::load(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;
    init_logging(&settings);

    let timeout_ms = cli.external_timeout_ms.unwrap_or(settings.external_timeout_ms);

    match cli.command {
        Commands::Availability {
            target,
            date,
            output,
        } => {
            let tz = target.timezone(&settings);
            let service = build_service(&target, timeout_ms)?;
            let availability = service
                .availability(&target.event_type, date, &tz)
                .await
                .with_context(|| format!("Failed to compute availability for '{}'", target.event_type))?;
            let json = serde_json::to_string_pretty(&availability)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Scan { target, from, days } => {
            let tz = target.timezone(&settings);
            let service = build_service(&target, timeout_ms)?;
            let dates = service
                .next_available_dates(&target.event_type, from, days, &tz)
                .await
                .with_context(|| format!("Failed to scan availability for '{}'", target.event_type))?;
            let out = ScanOutput {
                event_type_id: &target.event_type,
                timezone: &tz,
                dates,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Validate { input } => {
            let json = read_input(input.as_deref())?;
            let event_type: EventTypeConfig =
                serde_json::from_str(&json).context("Failed to parse event type JSON")?;
            let problems = event_type.problems();
            if !problems.is_empty() {
                anyhow::bail!(
                    "event type '{}' is invalid:\n  - {}",
                    event_type.id,
                    problems.join("\n  - ")
                );
            }
            println!("event type '{}' is valid", event_type.id);
        }
    }

    Ok(())
}

impl Target {
    fn timezone(&self, settings: &Settings) -> String {
        self.tz
            .clone()
            .unwrap_or_else(|| settings.default_timezone.clone())
    }
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_service(target: &Target, timeout_ms: u64) -> Result<AvailabilityService> {
    let json = read_input(Some(&target.store))?;
    let store = InMemoryStore::from_json(&json)
        .with_context(|| format!("Failed to parse store fixture: {}", target.store))?;
    debug!(
        event_types = store.event_types.len(),
        bookings = store.bookings.len(),
        external_busy = store.external_busy.len(),
        "loaded store fixture"
    );

    let mut service = AvailabilityService::from_store(store)
        .with_external_timeout(Duration::from_millis(timeout_ms));
    if let Some(now) = target.now {
        service = service.with_clock(Arc::new(FixedClock(now)));
    }
    Ok(service)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
