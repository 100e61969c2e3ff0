use clap::{Parser, Subcommand};
use devfocus_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "devfocus-cli", version, about = "DevFocus CLI")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Subtask lifecycle: add, start, pause, resume, done
    Subtask {
        #[command(subcommand)]
        action: commands::subtask::SubtaskAction,
    },
    /// Live terminal tracker for a subtask (Ctrl-C to stop)
    Track(commands::track::TrackArgs),
    /// Task and global metrics
    Metrics {
        #[command(subcommand)]
        action: commands::metrics::MetricsAction,
    },
    /// Category management
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// XP, level and streak
    Profile,
    /// Open a summary view in the browser
    Open {
        #[command(subcommand)]
        action: commands::open::OpenAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli, config: Config) -> commands::CliResult {
    let json = cli.json;
    match cli.command {
        Commands::Task { action } => commands::task::run(action, json).await,
        Commands::Subtask { action } => commands::subtask::run(action, json).await,
        Commands::Track(args) => commands::track::run(args, &config, json).await,
        Commands::Metrics { action } => commands::metrics::run(action, json).await,
        Commands::Category { action } => commands::category::run(action, json).await,
        Commands::Profile => commands::profile::run(json).await,
        Commands::Open { action } => commands::open::run(action, &config),
        Commands::Config { action } => commands::config::run(action, config, json),
    }
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(dispatch(cli, config)),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
