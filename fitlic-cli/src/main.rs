//! fitlic - Music licensing fee estimator for fitness facilities
//!
//! Reads a facility description from a TOML file, runs it through the
//! fee engine and prints the per-organization breakdown, optionally with
//! the direct-licensing vs. bundled-subscription comparison.
//!
//! Example facility file:
//!
//! ```toml
//! location_count = 3
//! total_members = 1200
//! square_footage = 8000
//! music_use_types = ["group", "ambient"]
//! is_association_member = true
//!
//! [[rooms]]
//! classes_per_week = 24
//! class_capacity = 30
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fitlic_engine::config::{ConfigResolver, TomlConfig};
use fitlic_engine::fees::sum_per_location_fees;
use fitlic_engine::{calculate_all_scenarios, calculate_total_fees, RateSchedule, RawFacilityInput};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

mod report;

use report::JsonReport;

/// Log level used until the configuration has been read
const DEFAULT_LOG_LEVEL: &str = "info";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Command-line arguments for fitlic
#[derive(Parser, Debug)]
#[command(name = "fitlic")]
#[command(about = "Estimate PRO music licensing fees for a fitness facility")]
#[command(version)]
struct Args {
    /// Facility description file (TOML)
    facility: PathBuf,

    /// Configuration file
    #[arg(short, long, env = "FITLIC_CONFIG")]
    config: Option<PathBuf>,

    /// Rate schedule file, overriding the one named in the configuration
    #[arg(short, long, env = "FITLIC_RATES")]
    rates: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Include the bundled-subscription scenario comparison
    #[arg(short, long)]
    scenarios: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing before anything logs; RUST_LOG wins over the
    // configured level
    let (filter, filter_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = bootstrap(&args, &filter_handle)?;

    info!(
        "fitlic v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    print!("{}", run(&args, &config)?);
    Ok(())
}

/// Load configuration and switch logging to its level
fn bootstrap(args: &Args, filter_handle: &FilterHandle) -> Result<TomlConfig> {
    let config = ConfigResolver::new()
        .load(args.config.as_deref())
        .context("Failed to load configuration")?;

    if std::env::var_os("RUST_LOG").is_none() {
        let level = &config.logging.level;
        if let Err(e) = filter_handle.reload(EnvFilter::new(level)) {
            warn!("Failed to apply log level {}: {}", level, e);
        }
    }

    Ok(config)
}

/// Produce the report for one invocation
fn run(args: &Args, config: &TomlConfig) -> Result<String> {
    let rates = match &args.rates {
        Some(path) => RateSchedule::from_toml_file(path)
            .with_context(|| format!("Failed to load rate schedule {}", path.display()))?,
        None => config.rate_schedule().context("Failed to load rate schedule")?,
    };
    let offer = config.bundled_offer().context("Invalid bundled subscription pricing")?;
    info!("Using {} rate schedule", rates.year);

    let facility = RawFacilityInput::from_toml_file(&args.facility)
        .and_then(RawFacilityInput::into_facility)
        .with_context(|| format!("Invalid facility file {}", args.facility.display()))?;
    debug!(?facility, "Facility description");

    let fees = calculate_total_fees(&facility, &rates);
    let scenarios = args
        .scenarios
        .then(|| calculate_all_scenarios(&facility, &rates, &offer));

    match args.format {
        OutputFormat::Text => {
            let mut out = report::render_fees(&facility, rates.year, &fees);
            if let Some(scenarios) = &scenarios {
                out.push('\n');
                out.push_str(&report::render_scenarios(&facility, scenarios));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let body = JsonReport {
                rate_year: rates.year,
                facility: &facility,
                fees: &fees,
                total_per_location_fee: sum_per_location_fees(&fees),
                scenarios: scenarios.as_ref(),
            };
            let json = serde_json::to_string_pretty(&body).context("Failed to serialize report")?;
            Ok(json + "\n")
        }
    }
}
