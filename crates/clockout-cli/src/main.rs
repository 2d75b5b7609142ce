use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "clockout", version, about = "Clock-out reminder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reminder loop until interrupted
    Run,
    /// Evaluate the reminder once and print the decision
    Check {
        /// Bypass the repeat interval, like a startup trigger
        #[arg(long)]
        immediate: bool,
    },
    /// Reminder settings management
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Skip reminders for the rest of today
    Skip {
        /// Lift today's skip instead
        #[arg(long)]
        undo: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// List public holidays of a year
    Holidays {
        /// Calendar year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_env("CLOCKOUT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run().await,
        Commands::Check { immediate } => commands::check::run(immediate).await,
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Skip { undo } => commands::skip::run(undo),
        Commands::Config { action } => commands::config::run(action),
        Commands::Holidays { year } => commands::holidays::run(year).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
