mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use storage::{CorpusSource, JsonCorpus, sample_corpus};

#[derive(Parser)]
#[command(name = "quiz")]
#[command(about = "Adaptive quiz engine: inspect a question corpus and simulate sessions")]
#[command(version)]
struct Cli {
    /// Question corpus (JSON). Defaults to the bundled sample corpus.
    #[arg(short, long, value_name = "FILE", env = "QUIZ_CORPUS", global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which subject each lesson resolves to and what its pool holds
    Audit {
        /// Extra lesson ids to check besides the mapped ones
        #[arg(value_name = "LESSON")]
        lessons: Vec<String>,
    },
    /// List subjects with their topics and question counts per difficulty
    Topics {
        /// Restrict output to one subject id
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Run a simulated learner through an adaptive session
    Simulate {
        /// Lesson id to start the session for
        #[arg(short, long)]
        lesson: String,

        /// Seed for question tie-breaks and simulated answers
        #[arg(long, env = "QUIZ_SEED")]
        seed: Option<u64>,

        /// Probability that the simulated learner answers correctly
        #[arg(short, long, default_value_t = 0.7)]
        accuracy: f64,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn corpus_source(path: Option<PathBuf>) -> Box<dyn CorpusSource> {
    match path {
        Some(path) => Box::new(JsonCorpus::from_path(path)),
        None => Box::new(sample_corpus()),
    }
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();
    let source = corpus_source(cli.corpus);

    match cli.command {
        Command::Audit { lessons } => commands::audit(source.as_ref(), &lessons),
        Command::Topics { subject } => commands::topics(source.as_ref(), subject.as_deref()),
        Command::Simulate {
            lesson,
            seed,
            accuracy,
            json,
        } => commands::simulate(source.as_ref(), &lesson, seed, accuracy, json),
    }
}
