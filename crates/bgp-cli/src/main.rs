use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bgp")]
#[command(about = "Board game plays ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the day window and reconcile play counts into the ledger
    Ingest {
        /// Layered config paths in merge order (defaults apply when omitted)
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Days back from today to scan (overrides ingest.window_days)
        #[arg(long)]
        days: Option<u32>,

        /// Upstream site root (overrides source.base_url)
        #[arg(long)]
        base_url: Option<String>,

        /// Seconds between upstream fetches (overrides source.pacing_secs)
        #[arg(long)]
        pacing_secs: Option<u64>,
    },

    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,

    /// Apply SQL migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dev-time convenience; a missing file is fine.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Ingest {
            config_paths,
            days,
            base_url,
            pacing_secs,
        } => {
            let overrides = commands::ingest::Overrides {
                days,
                base_url,
                pacing_secs,
            };
            commands::ingest::run(&config_paths, overrides).await?;
        }
        Commands::Db { cmd } => {
            let pool = bgp_db::connect_from_env().await?;
            match cmd {
                DbCmd::Status => {
                    let s = bgp_db::status(&pool).await?;
                    println!("db_ok={} has_ledger_tables={}", s.ok, s.has_ledger_tables);
                }
                DbCmd::Migrate => {
                    bgp_db::migrate(&pool).await?;
                    println!("migrations_applied=true");
                }
            }
        }
        Commands::ConfigHash { paths } => {
            let loaded = commands::load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the `key=value` results.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
