mod logging;
mod pipeline;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use pitstop_core::{resolve_race_name, AppConfig, SeasonCatalog};
use pitstop_scraper::{fetch_events, AwardClient, ChartWatcher};

#[derive(Debug, Parser)]
#[command(name = "pitstop")]
#[command(about = "Watch and export F1 award data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the watch endpoint until chart data appears
    Watch {
        /// Endpoint to poll (overrides PITSTOP_WATCH_URL)
        #[arg(long)]
        url: Option<String>,
        /// Seconds between checks (overrides PITSTOP_WATCH_INTERVAL_SECS)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Fetch a season's events and write one JSON file per race
    Fetch {
        /// Season year (defaults to the latest configured season)
        #[arg(long)]
        year: Option<u16>,
        /// Output root; files go to <dir>/<year>/ (overrides PITSTOP_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print a season's event list as JSON
    Events {
        /// Season year (defaults to the latest configured season)
        #[arg(long)]
        year: Option<u16>,
    },
    /// Print the race name an event title resolves to
    Resolve {
        /// Event title, e.g. "FORMULA 1 TAG HEUER GRAND PRIX DE MONACO 2025"
        title: String,
        /// Season year (defaults to the latest configured season)
        #[arg(long)]
        year: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = pitstop_core::load_app_config()?;
    let _log_guard = logging::init_logging(&config.log_level, config.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Watch { url, interval_secs }) => {
            run_watch(&config, url, interval_secs).await?;
        }
        Some(Commands::Fetch { year, output_dir }) => {
            let catalog = load_catalog(&config.seasons_path)?;
            let year = year.unwrap_or_else(|| catalog.latest().year);
            let output_root = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let summary = pipeline::run_fetch(&config, &catalog, year, &output_root).await?;
            for path in &summary.written {
                println!("{}", path.display());
            }
            println!(
                "saved {} of {} events ({} skipped)",
                summary.written.len(),
                summary.events,
                summary.skipped
            );
        }
        Some(Commands::Events { year }) => {
            let catalog = load_catalog(&config.seasons_path)?;
            let year = year.unwrap_or_else(|| catalog.latest().year);
            let season = catalog.select(year).season;
            let client = pipeline::build_client(&config)?;
            let events = fetch_events(&client, &season.event_list_url).await;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        Some(Commands::Resolve { title, year }) => {
            let catalog = load_catalog(&config.seasons_path)?;
            let year = year.unwrap_or_else(|| catalog.latest().year);
            println!("{}", resolve_race_name(&catalog, &title, year).name());
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// Loads the season catalog from `path`, or the bundled copy when the file
/// does not exist. A file that exists but fails to parse is an error.
fn load_catalog(path: &Path) -> anyhow::Result<SeasonCatalog> {
    if path.exists() {
        let catalog = pitstop_core::load_seasons(path)?;
        tracing::debug!(path = %path.display(), years = ?catalog.years(), "loaded season catalog");
        Ok(catalog)
    } else {
        tracing::debug!(path = %path.display(), "season file not found, using bundled catalog");
        Ok(SeasonCatalog::bundled()?)
    }
}

async fn run_watch(
    config: &AppConfig,
    url: Option<String>,
    interval_secs: Option<u64>,
) -> anyhow::Result<()> {
    let mut watch = config.watch.clone();
    if let Some(url) = url {
        watch.url = url;
    }
    if let Some(secs) = interval_secs {
        watch.check_interval = Duration::from_secs(secs);
    }

    let client = AwardClient::new(config.request_timeout_secs, &watch.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build award API client: {e}"))?;
    let mut watcher = ChartWatcher::new(client, &watch);

    tokio::select! {
        items = watcher.run() => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("monitoring stopped by user");
        }
    }
    Ok(())
}
