//! Promo Sift CLI
//!
//! Runs the offer pipeline over a fixture set and prints the ranked offers.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use jiff::{Zoned, civil::Date};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use promo_sift::{
    fixtures::{Fixture, FixtureError},
    report::{self, OfferFilter, ReportError},
};

#[derive(Debug, Parser)]
#[command(name = "promo-sift", about = "Extract and rank promotional offers from emails", long_about = None)]
struct Cli {
    /// Directory holding the fixture files
    #[arg(long, env = "PROMO_SIFT_FIXTURES", default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Fixture set for taxonomy, merchant rules and extraction settings
    #[arg(long, default_value = "default")]
    set: String,

    /// Message fixtures to process instead of the set's own messages
    #[arg(long = "messages", value_name = "NAME")]
    messages: Vec<String>,

    /// Evaluation date, YYYY-MM-DD; defaults to today in the system time zone
    #[arg(long)]
    today: Option<Date>,

    /// Only show offers in this category
    #[arg(long)]
    category: Option<String>,

    /// Only show offers expiring within seven days
    #[arg(long, conflicts_with = "expiring_within")]
    expiring_soon: bool,

    /// Only show offers expiring within this many days
    #[arg(long, value_name = "DAYS")]
    expiring_within: Option<i32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level used when `RUST_LOG` is not set
    #[arg(long, env = "PROMO_SIFT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("failed to write report: {0}")]
    Report(#[from] ReportError),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the terminal, logging may not be initialised"
            )]
            {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    init_logging(cli)?;

    let mut fixture = Fixture::with_base_path(cli.fixtures.clone());

    fixture
        .load_taxonomy(&cli.set)?
        .load_merchants(&cli.set)?
        .load_extraction(&cli.set)?;

    if cli.messages.is_empty() {
        fixture.load_messages(&cli.set)?;
    } else {
        for name in &cli.messages {
            fixture.load_messages(name)?;
        }
    }

    let pipeline = fixture.pipeline()?;
    let today = cli.today.unwrap_or_else(|| Zoned::now().date());

    info!(set = %cli.set, %today, messages = fixture.messages().len(), "processing messages");

    let offers = pipeline.run(fixture.messages(), today);
    let shown = filter(cli).apply(&offers);

    let mut out = io::stdout().lock();

    match cli.format {
        OutputFormat::Table => report::write_table(&mut out, shown)?,
        OutputFormat::Json => report::write_json(&mut out, shown)?,
    }

    out.flush().map_err(ReportError::from)?;

    Ok(())
}

fn filter(cli: &Cli) -> OfferFilter {
    let mut filter = OfferFilter::all();

    if let Some(category) = &cli.category {
        filter = filter.in_category(category.as_str());
    }

    if cli.expiring_soon {
        filter = filter.expiring_soon();
    }

    if let Some(days) = cli.expiring_within {
        filter = filter.expiring_within(days);
    }

    filter
}

fn init_logging(cli: &Cli) -> Result<(), TryInitError> {
    match cli.log_format {
        LogFormat::Compact => init_with_layer(
            cli,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            cli,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn init_with_layer<L>(cli: &Cli, fmt_layer: L) -> Result<(), TryInitError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
}
