//! SlotDB CLI
//!
//! Command-line shell over a store in the current (or given) directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotdb::command::{Command, Response, DEFAULT_GENERATE_COUNT, DEFAULT_SAMPLE_SIZE};
use slotdb::{Config, PayloadMode, Store, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// SlotDB CLI
#[derive(Parser, Debug)]
#[command(name = "slotdb")]
#[command(about = "Persistent key-indexed record store")]
#[command(version)]
struct Args {
    /// Directory holding database.dat and index.idx (defaults to the current directory)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Reject text longer than 63 bytes instead of truncating it
    #[arg(long)]
    strict: bool,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    /// Seed for random generation and sampling
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new record
    Add {
        #[arg(allow_negative_numbers = true)]
        key: i32,
        text: String,
    },

    /// Look up a record by key
    Search {
        #[arg(allow_negative_numbers = true)]
        key: i32,
    },

    /// Replace the text of an existing record
    Edit {
        #[arg(allow_negative_numbers = true)]
        key: i32,
        text: String,
    },

    /// Remove a key
    Remove {
        #[arg(allow_negative_numbers = true)]
        key: i32,
    },

    /// Replace everything with random records, then sample search cost
    Generate {
        #[arg(default_value_t = DEFAULT_GENERATE_COUNT)]
        count: usize,

        /// Number of random lookups to average afterwards
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        samples: usize,
    },

    /// Delete all records and index entries
    Clear,

    /// Print the index table
    Index,

    /// Print the records in the data file
    Records {
        /// Maximum number of records to print
        #[arg(short, long, default_value_t = 1000)]
        limit: usize,
    },

    /// Describe search complexity
    Info,

    /// Rewrite the data file without orphaned slots
    Compact,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slotdb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> slotdb::Result<()> {
    let mut config = match args.data_dir {
        Some(dir) => Config::builder().data_dir(dir).build(),
        None => Config::from_current_dir()?,
    };
    if args.strict {
        config.payload_mode = PayloadMode::Strict;
    }
    if args.sync {
        config.sync_strategy = SyncStrategy::EveryWrite;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut store = Store::open(config)?;

    let (command, follow_up) = match args.command {
        Commands::Add { key, text } => (Command::Add { key, text: require_text(text)? }, None),
        Commands::Search { key } => (Command::Search { key }, None),
        Commands::Edit { key, text } => (Command::Edit { key, text: require_text(text)? }, None),
        Commands::Remove { key } => (Command::Remove { key }, None),
        Commands::Generate { count, samples } => (
            Command::Generate { count },
            Some(Command::Sample { samples }),
        ),
        Commands::Clear => (Command::Clear, None),
        Commands::Index => (Command::ListIndex, None),
        Commands::Records { limit } => {
            let response = store.execute(Command::ListRecords, &mut rng)?;
            print_records(response, limit);
            return Ok(());
        }
        Commands::Info => (Command::Complexity, None),
        Commands::Compact => (Command::Compact, None),
    };

    let response = store.execute(command, &mut rng)?;
    println!("{}", response);
    let succeeded = response.is_success();

    if let Some(command) = follow_up {
        println!("{}", store.execute(command, &mut rng)?);
    }

    // Mutations persist the index themselves; the store is just dropped
    drop(store);
    if !succeeded {
        std::process::exit(2);
    }
    Ok(())
}

/// Empty text is refused here; the store itself accepts it
fn require_text(text: String) -> slotdb::Result<String> {
    if text.is_empty() {
        return Err(slotdb::SlotDbError::InvalidArgument(
            "data cannot be empty".to_string(),
        ));
    }
    Ok(text)
}

fn print_records(response: Response, limit: usize) {
    let Response::Records(mut records) = response else {
        println!("{}", response);
        return;
    };

    let total = records.len();
    records.truncate(limit);
    println!("{}", Response::Records(records));
    if total > limit {
        println!("Displaying first {} records of {}", limit, total);
    }
}
