//! spec-rag - question answering over product spec sheets.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spec_rag::storage::config::ConfigService;
use spec_rag::{AppState, SettingsUpdate, DEMO_QUESTIONS};

#[derive(Parser)]
#[command(name = "spec-rag", about = "Ask questions about product spec sheets", version)]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory with the spec-sheet PDFs.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// SQLite database file.
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the built-in demo questions (default).
    Demo,
    /// Answer the given questions.
    Ask {
        #[arg(required = true)]
        questions: Vec<String>,
    },
    /// Extract dataset documents that are not in the database yet.
    Ingest,
    /// Run a raw SQL query against the product table.
    Sql {
        query: String,
    },
    /// Print the effective configuration.
    Config {
        /// Also write it to this file.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "spec_rag=debug" } else { "spec_rag=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn print_answer(question: &str, answer: &str) {
    println!("{}", "=".repeat(15));
    println!("Question: {}", question);
    println!("Answer: {}", answer);
}

async fn answer_all<S: AsRef<str>>(state: &AppState, questions: &[S]) -> anyhow::Result<()> {
    state.ensure_populated().await?;
    for question in questions {
        let question = question.as_ref();
        let answer = state
            .answer(question)
            .await
            .with_context(|| format!("failed to answer {:?}", question))?;
        print_answer(question, &answer);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config_service = ConfigService::load(cli.config.as_deref())?;
    config_service.apply_overrides(ConfigService::settings_from_env(|key| {
        std::env::var(key).ok()
    }))?;
    let config = config_service
        .apply_overrides(SettingsUpdate {
            dataset_dir: cli.dataset,
            database_path: cli.database,
            ..Default::default()
        })?
        .clone();

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if let Some(path) = save {
                let written = config_service.save(Some(&path))?;
                tracing::info!(path = %written.display(), "Configuration saved");
            }
        }
        Commands::Sql { query } => {
            let state = AppState::initialize(&config)?;
            let rows = state.query(&query)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Ingest => {
            let state = AppState::initialize(&config)?;
            let inserted = state.ingest().await?;
            println!("Inserted {} product(s)", inserted);
        }
        Commands::Ask { questions } => {
            let state = AppState::initialize(&config)?;
            answer_all(&state, &questions).await?;
        }
        Commands::Demo => {
            let state = AppState::initialize(&config)?;
            answer_all(&state, &DEMO_QUESTIONS).await?;
        }
    }

    Ok(())
}
