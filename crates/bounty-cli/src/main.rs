//! Bounty program maintenance CLI.
//!
//! Provides the `bounty` binary. Currently supports `seed`, which fills a
//! program database with generated sample programs.

mod seed;

use std::process;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use bounty_storage::{ProgramStore, SqliteStore};

/// Bug-bounty program tools.
#[derive(Parser)]
#[command(name = "bounty", about = "Bug-bounty program tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Replace all programs with generated sample data.
    Seed {
        /// Path to the program database file.
        #[arg(short, long)]
        db: String,

        /// Number of programs to generate.
        #[arg(short, long, default_value_t = 25)]
        count: usize,

        /// Programs per insert batch.
        #[arg(short, long, default_value_t = 10)]
        batch_size: usize,

        /// RNG seed for reproducible data (default: random).
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed {
            db,
            count,
            batch_size,
            seed,
        } => process::exit(run_seed(&db, count, batch_size, seed)),
    }
}

/// Execute the seed subcommand.
///
/// Returns exit code: 0 = success, 1 = storage error.
fn run_seed(db_path: &str, count: usize, batch_size: usize, seed: Option<u64>) -> i32 {
    let store = match SqliteStore::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", db_path, e);
            return 1;
        }
    };

    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(db_path, seed, "starting database seeding");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let result = seed::seed_programs(&store, &mut rng, count, batch_size)
        .and_then(|inserted| store.close().map(|()| inserted));
    match result {
        Ok(inserted) => {
            tracing::info!(inserted, "database seeding completed");
            0
        }
        Err(e) => {
            eprintln!("Error seeding database: {}", e);
            1
        }
    }
}
