//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use feedcast_core::completion::OpenRouterClient;
use feedcast_core::pipeline::{self, DigestConfig, DigestResult, ProgressReporter};
use feedcast_reader::ReaderClient;
use feedcast_shared::{AppConfig, init_config, load_config, require_env};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// feedcast: turn unread articles into a podcast transcript.
#[derive(Parser)]
#[command(
    name = "feedcast",
    version,
    about = "Turn a day of unread read-it-later articles into a multi-host podcast transcript.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch, compose, and publish a digest episode.
    Run {
        /// Look this many hours back for updated articles (default from config).
        #[arg(long)]
        hours: Option<u64>,

        /// Reader location to fetch from and publish to (default from config).
        #[arg(long)]
        location: Option<String>,

        /// Override the completion model for this run.
        #[arg(long)]
        model: Option<String>,

        /// Compose the script and print it instead of publishing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "feedcast=info",
        1 => "feedcast=debug",
        _ => "feedcast=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            hours,
            location,
            model,
            dry_run,
        } => cmd_run(hours, location.as_deref(), model.as_deref(), dry_run).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(
    hours: Option<u64>,
    location: Option<&str>,
    model: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    // Both secrets are required up front, before any network call
    let config = load_config()?;
    let reader_token = require_env(&config.reader.api_token_env)?;
    let api_key = require_env(&config.openrouter.api_key_env)?;

    let reader = ReaderClient::new(&config.reader.base_url, reader_token)?;
    let completion = OpenRouterClient::new(
        &config.openrouter.base_url,
        api_key,
        model.unwrap_or(&config.openrouter.default_model),
    )?;

    let digest_config = DigestConfig {
        lookback_hours: hours.unwrap_or(config.defaults.lookback_hours),
        location: location
            .map(String::from)
            .unwrap_or_else(|| config.defaults.location.clone()),
        script: config.script.clone(),
        dry_run,
    };

    info!(
        lookback_hours = digest_config.lookback_hours,
        location = %digest_config.location,
        dry_run,
        "starting digest"
    );

    // Set up progress reporting
    let reporter = CliProgress::new();

    let result = pipeline::run_digest(&digest_config, &reader, &completion, &reporter).await?;

    if let Some(transcript) = &result.transcript {
        // Dry run: the transcript goes to stdout instead of the service.
        println!("{transcript}");
    }

    // Print summary
    println!();
    if dry_run {
        println!("  Dry run complete; nothing was published.");
    } else {
        println!("  Podcast saved successfully!");
    }
    println!("  Articles: {}", result.articles);
    println!("  Segments: {}", result.segments);
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    if let Some(response) = &result.saved_response {
        println!("  Response: {response}");
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn segment(&self, current: usize, total: usize, label: &str) {
        self.spinner.set_message(format!(
            "Generating [{current}/{total}] {label}"
        ));
    }

    fn done(&self, _result: &DigestResult) {
        self.spinner.finish_and_clear();
    }
}
