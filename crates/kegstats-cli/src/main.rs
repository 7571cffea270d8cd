use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "kegstats", version, about = "Keg pour analytics: BAC, sessions, leaderboards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drinker registration
    Drinker {
        #[command(subcommand)]
        action: commands::drinker::DrinkerAction,
    },
    /// Keg management
    Keg {
        #[command(subcommand)]
        action: commands::keg::KegAction,
    },
    /// Record and inspect pours
    Pour {
        #[command(subcommand)]
        action: commands::pour::PourAction,
    },
    /// Blood alcohol estimates
    Bac {
        #[command(subcommand)]
        action: commands::bac::BacAction,
    },
    /// Group a drinker's pours into sessions
    Sessions(commands::sessions::SessionsArgs),
    /// Rate how fast a drinker drinks
    Rating(commands::rating::RatingArgs),
    /// Lifetime stats for a drinker
    Stats(commands::stats::StatsArgs),
    /// Leaderboards
    Leaders(commands::leaders::LeadersArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KEGSTATS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Drinker { action } => commands::drinker::run(action),
        Commands::Keg { action } => commands::keg::run(action),
        Commands::Pour { action } => commands::pour::run(action),
        Commands::Bac { action } => commands::bac::run(action),
        Commands::Sessions(args) => commands::sessions::run(args),
        Commands::Rating(args) => commands::rating::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Leaders(args) => commands::leaders::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
