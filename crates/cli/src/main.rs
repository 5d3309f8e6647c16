//! PBLForge CLI — the main entry point.
//!
//! Commands:
//! - `stage`     — Parse local files and show their staging lifecycle
//! - `generate`  — Generate a cross-disciplinary assignment
//! - `evaluate`  — Evaluate a student submission against an assignment
//! - `hint`      — Ask the tutor for a hint on a draft answer
//! - `kb`        — Inspect or reset the custom knowledge base

use clap::{Parser, Subcommand};
use pblforge_core::model::Difficulty;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "pblforge",
    about = "PBLForge — knowledge-augmented assignment generation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: ~/.pblforge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage local files, parse them, and print their statuses
    Stage {
        /// Files to stage (txt, md, csv, pdf, docx)
        files: Vec<PathBuf>,

        /// Promote the parsed files into the custom knowledge base
        #[arg(long)]
        promote: bool,
    },

    /// Generate a cross-disciplinary assignment
    Generate {
        /// The phenomenon or topic to explore
        #[arg(short, long)]
        topic: String,

        /// Subjects to integrate (repeat for each)
        #[arg(short, long = "subject", required = true)]
        subjects: Vec<String>,

        /// Task depth
        #[arg(short, long, value_enum, default_value = "basic")]
        difficulty: CliDifficulty,

        /// Extra files merged into the corpus for this call only
        #[arg(long = "with-file")]
        with_files: Vec<PathBuf>,
    },

    /// Evaluate a student submission against an assignment
    Evaluate {
        /// Assignment id (see `generate` output)
        #[arg(long)]
        assignment: String,

        /// Student name
        #[arg(long, default_value = "学生")]
        student: String,

        /// The submission text
        #[arg(long)]
        text: String,

        /// Optional image of the submitted work
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Ask the tutor for a hint on a draft answer
    Hint {
        /// Assignment id
        #[arg(long)]
        assignment: String,

        /// The student's current draft
        #[arg(long)]
        draft: String,
    },

    /// Inspect or reset the custom knowledge base
    Kb {
        /// Discard the custom corpus and revert to the built-in default
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliDifficulty {
    Basic,
    Challenge,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Basic => Difficulty::Basic,
            CliDifficulty::Challenge => Difficulty::Challenge,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(pblforge_config::AppConfig::default_path);
    let config = pblforge_config::AppConfig::load(&config_path)?;

    match cli.command {
        Commands::Stage { files, promote } => commands::stage::run(&config, files, promote).await?,
        Commands::Generate {
            topic,
            subjects,
            difficulty,
            with_files,
        } => {
            commands::generate::run(&config, topic, subjects, difficulty.into(), with_files).await?
        }
        Commands::Evaluate {
            assignment,
            student,
            text,
            image,
        } => commands::evaluate::run(&config, assignment, student, text, image).await?,
        Commands::Hint { assignment, draft } => {
            commands::hint::run(&config, assignment, draft).await?
        }
        Commands::Kb { reset } => commands::kb::run(&config, reset).await?,
    }

    Ok(())
}
