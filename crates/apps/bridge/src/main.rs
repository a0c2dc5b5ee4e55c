use anyhow::{Context, Result};
use bridge::{
    config, start_stats_reporter, Bridge, BridgeConfig, ConfigWatcher, FrameReader, LightCatalog,
};
use clap::{Parser, Subcommand};
use controller::{Dispatcher, DryRunService, HomeAssistantClient, LightService};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Mirror in-game lighting onto Home Assistant lights
#[derive(Parser)]
#[command(name = "bridge")]
#[command(about = "Drive Home Assistant lights from game lighting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tick loop
    Run {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Observation frames, one JSON object per line ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        frames: PathBuf,

        /// Lights database (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Log service calls instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Debug-level logging
        #[arg(short, long)]
        verbose: bool,

        /// Do not reload the configuration when it changes
        #[arg(long)]
        no_watch: bool,

        /// Delay before the first tick, in milliseconds
        #[arg(long, default_value = "0")]
        initial_delay_ms: u64,
    },

    /// Validate a configuration file and print a summary
    Check {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Lights database (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            frames,
            catalog,
            dry_run,
            verbose,
            no_watch,
            initial_delay_ms,
        } => {
            init_tracing(verbose || config::peek_debug_mode(&config));
            run_command(
                config,
                frames,
                catalog,
                dry_run,
                !no_watch,
                Duration::from_millis(initial_delay_ms),
            )
            .await?;
        }
        Commands::Check { config, catalog } => {
            init_tracing(false);
            check_command(&config, catalog.as_deref())?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` when verbose.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_catalog(path: Option<&Path>) -> Result<LightCatalog> {
    match path {
        Some(path) => LightCatalog::load(path)
            .with_context(|| format!("loading lights database {}", path.display())),
        None => {
            tracing::warn!("No lights database given; every light will be white");
            Ok(LightCatalog::default())
        }
    }
}

async fn run_command(
    config_path: PathBuf,
    frames_path: PathBuf,
    catalog_path: Option<PathBuf>,
    dry_run: bool,
    watch: bool,
    initial_delay: Duration,
) -> Result<()> {
    let config = BridgeConfig::load(&config_path)
        .with_context(|| format!("loading configuration {}", config_path.display()))?;
    let catalog = load_catalog(catalog_path.as_deref())?;
    let mut frames = FrameReader::open(&frames_path)
        .await
        .with_context(|| format!("opening frames {}", frames_path.display()))?;

    let watcher = if watch {
        match ConfigWatcher::new(&config_path, bridge::watcher::DEFAULT_DEBOUNCE) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!("Hot reload disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    if dry_run {
        tracing::info!("Dry run: service calls are logged, not sent");
        let dispatcher = Dispatcher::new(DryRunService);
        drive(Bridge::new(config_path, config, catalog, dispatcher), watcher, &mut frames, initial_delay).await
    } else {
        let settings = &config.home_assistant;
        let client = HomeAssistantClient::new(settings.url.clone(), settings.token.clone());
        let dispatcher = Dispatcher::new(client);
        drive(Bridge::new(config_path, config, catalog, dispatcher), watcher, &mut frames, initial_delay).await
    }
}

async fn drive<S: LightService>(
    bridge: Bridge<S>,
    watcher: Option<ConfigWatcher>,
    frames: &mut FrameReader,
    initial_delay: Duration,
) -> Result<()> {
    let mut bridge = match watcher {
        Some(watcher) => bridge.with_watcher(watcher),
        None => bridge,
    };

    let reporter = tokio::spawn(start_stats_reporter(bridge.stats()));
    let result = bridge.run(frames, initial_delay).await;
    reporter.abort();
    result
}

fn check_command(config_path: &Path, catalog_path: Option<&Path>) -> Result<()> {
    let config = BridgeConfig::load(config_path)
        .with_context(|| format!("loading configuration {}", config_path.display()))?;
    let catalog = load_catalog(catalog_path)?;
    let lighting = &config.lighting;
    let options = lighting.options();

    println!("Configuration OK: {}", config_path.display());
    println!(
        "  Home Assistant: {}",
        if config.home_assistant.is_complete() {
            config.home_assistant.url.as_str()
        } else {
            "(incomplete)"
        }
    );
    println!("  Fixtures:       {}", lighting.fixtures().len());
    println!("  Keyframes:      {}", lighting.day_night().len());
    println!("  Scenarios:      {}", lighting.scenarios().len());
    println!(
        "  Options:        sharpness {}, max distance {}, smoothing {}, tick {:?}",
        options.direction_sharpness,
        options.max_distance,
        options.smoothing_factor,
        config.tick_interval
    );
    println!("  Light catalog:  {} definitions", catalog.len());
    if config.unknown_triggers.is_empty() {
        println!("  Unknown triggers: none");
    } else {
        println!("  Unknown triggers:");
        for entry in &config.unknown_triggers {
            println!("    - {}", entry);
        }
    }
    Ok(())
}
