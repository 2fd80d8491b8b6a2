//! quizgen CLI: generate and play English multiple-choice quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use quizgen_core::model::CefrLevel;
use tracing_subscriber::EnvFilter;

mod commands;
mod interactive;

#[derive(Parser)]
#[command(
    name = "quizgen",
    version,
    about = "LLM-generated English multiple-choice quizzes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new question set, replacing the stored one, and start a quiz
    Generate {
        /// CEFR difficulty: A2, B1, B2, C1 or C2
        #[arg(long, default_value = "B1")]
        level: CefrLevel,

        /// Extra guidance for the questions (e.g. "phrasal verbs")
        #[arg(long)]
        hint: Option<String>,

        /// Only generate and store; do not start a quiz
        #[arg(long)]
        no_play: bool,

        /// SQLite database path (overrides config)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play the stored question set from the beginning
    Play {
        /// SQLite database path (overrides config)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the stored question set with answers
    Show {
        /// SQLite database path (overrides config)
        #[arg(long)]
        database: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            level,
            hint,
            no_play,
            database,
            config,
        } => commands::generate::execute(level, hint, no_play, database, config).await,
        Commands::Play { database, config } => commands::play::execute(database, config),
        Commands::Show { database, config } => commands::show::execute(database, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
