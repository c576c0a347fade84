use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pool_tracker::api::{build_router, state::AppState};
use pool_tracker::bulk;
use pool_tracker::config::AppConfig;
use pool_tracker::fetch::StandingsFetcher;
use pool_tracker::parse_duration;
use pool_tracker::storage::{self, StorageConfig};
use pool_tracker::sync::SyncOrchestrator;

#[derive(Parser)]
#[command(name = "pool-tracker")]
#[command(about = "Season-long prediction pool tracker")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Also run a periodic sync at this interval (e.g. "6h", "30m")
        #[arg(long)]
        sync_every: Option<String>,
    },

    /// Sync standings from the source
    Sync {
        /// Run sync once and exit
        #[arg(long)]
        once: bool,

        /// Run continuously at interval
        #[arg(long)]
        watch: bool,

        /// Sync interval (e.g., "6h", "30m")
        #[arg(long, default_value = "6h")]
        interval: String,
    },

    /// Export the roster as flat JSON rows
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Import a roster from flat JSON rows
    Import {
        /// Path to a JSON array of roster rows
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pool-tracker v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let mut config = if config_path.exists() {
        AppConfig::from_file(&config_path)
            .with_context(|| format!("loading config from {}", cli.config))?
    } else {
        tracing::info!("No config file at {}, using defaults", cli.config);
        AppConfig::default()
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            sync_every,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(config)?;

            if let Some(ref every) = sync_every {
                let interval = parse_duration(every)
                    .with_context(|| format!("invalid --sync-every: {}", every))?;
                let sync = state.sync.clone();
                tokio::spawn(async move {
                    sync.run_periodic(interval).await;
                });
            }

            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Sync {
            once,
            watch,
            interval: interval_str,
        } => {
            let storage = StorageConfig::new(config.data_dir.clone());
            let fetcher = StandingsFetcher::new(config.source.clone())?;
            let orchestrator = SyncOrchestrator::new(config.pool.clone(), fetcher, storage);

            if once {
                let result = orchestrator.sync_once().await?;
                println!("\n=== Sync Results ===");
                println!("Teams synced:     {}", result.teams_synced);
                println!("Round:            {}", result.round_number);
                println!("Session:          {}", result.session_date);
                println!("Snapshot rows:    {}", result.snapshots_recorded);
                println!("Duration:         {:?}", result.duration);
            } else if watch {
                let interval =
                    parse_duration(&interval_str).unwrap_or(Duration::from_secs(6 * 3600));
                tracing::info!("Running periodic sync (interval: {})...", interval_str);
                Arc::new(orchestrator).run_periodic(interval).await;
            } else {
                eprintln!("Specify --once or --watch");
            }
        }
        Commands::Export { output } => {
            let storage = StorageConfig::new(config.data_dir.clone());
            let mut participants = storage::read_participants(&storage)?;
            participants.sort_by_key(|p| p.registration_order);

            let teams = storage::read_teams(&storage)?;
            let by_external_id = teams.into_iter().map(|t| (t.external_id, t)).collect();

            let rows = bulk::export_rows(&participants, &by_external_id);
            let json = serde_json::to_string_pretty(&rows)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported {} rows to {}", rows.len(), path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { input } => {
            let storage = StorageConfig::new(config.data_dir.clone());
            let contents = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input))?;
            let rows: Vec<bulk::BulkRow> = serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", input))?;

            let summary =
                bulk::apply_import(&storage, &rows, config.pool.picks_per_participant)?;
            println!("\n=== Import Results ===");
            println!("Created:  {}", summary.created);
            println!("Skipped:  {}", summary.skipped);
            println!("Errors:   {}", summary.errors.len());
            for err in &summary.errors {
                println!("  - {}", err);
            }
        }
    }

    Ok(())
}
