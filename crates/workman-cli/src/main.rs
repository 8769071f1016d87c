use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "workman",
    version,
    about = "Track work hours and manage a to-do list"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new work session
    Start,
    /// Stop the current work session
    Stop,
    /// Show current work session status
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Work log reports and pruning
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// To-do list management
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WORKMAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Start => commands::session::start(),
        Commands::Stop => commands::session::stop(),
        Commands::Status { json } => commands::session::status(json),
        Commands::Log { action } => commands::log::run(action),
        Commands::Todo { action } => commands::todo::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "workman", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
