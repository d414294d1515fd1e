// EduQuiz - document-to-quiz generation pipeline
// Main entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use eduquiz::config::load_settings;
use eduquiz::generate::QuizGenerator;
use eduquiz::quiz::{Difficulty, QuizRequest};

#[derive(Parser)]
#[command(name = "eduquiz", about = "Génère des QCM à partir de vos documents", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a multiple-choice quiz from a text file
    Generate {
        /// Path to the extracted document text
        file: PathBuf,

        /// Number of questions to generate (1-20)
        #[arg(short = 'n', long, default_value_t = 5)]
        questions: usize,

        /// Difficulty: standard, intermediate, advanced or expert
        #[arg(short, long, default_value = "standard")]
        difficulty: String,
    },
    /// Extract the key points of a document
    Summary {
        /// Path to the extracted document text
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let settings = load_settings()?;
    let generator = QuizGenerator::from_settings(&settings)?;

    match cli.command {
        Command::Generate {
            file,
            questions,
            difficulty,
        } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let difficulty: Difficulty = difficulty.parse().unwrap_or_default();
            let quiz = generator
                .generate(&QuizRequest::new(text, questions, difficulty))
                .await;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }
        Command::Summary { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let points = generator.generate_summary(&text).await;
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
    }

    Ok(())
}
