use clap::{Parser, Subcommand};
use garmin_sync::cli::commands;

#[derive(Parser)]
#[command(name = "garmin-sync")]
#[command(author, version, about = "Sync daily Garmin Connect wellness data to SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one day of data and upsert it into the database
    Sync {
        /// Date to sync (YYYY-MM-DD), defaults to yesterday
        date: Option<String>,
        /// Database file path
        #[arg(long, env = "GARMIN_SYNC_DB")]
        db: Option<String>,
    },
    /// Show row counts for synced tables
    Status {
        /// Database file path
        #[arg(long, env = "GARMIN_SYNC_DB")]
        db: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync { date, db } => commands::run(date, db),
        Commands::Status { db } => commands::status(db),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", garmin_sync::error::format_user_error(&e));
        std::process::exit(1);
    }
}
