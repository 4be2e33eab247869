//! objdigest CLI - canonical forms and digests of JSON documents.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{canonicalize, digest};

#[derive(Parser)]
#[command(name = "objdigest")]
#[command(about = "Deterministic canonical forms and digests for JSON documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the canonical form of input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Field name to leave out at every depth (repeatable)
        #[arg(long = "exclude", short = 'x')]
        exclude: Vec<String>,
    },
    /// Compute the digest of input JSON
    Digest {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Hash algorithm: md5, sha-1, sha-256, sha-384 or sha-512
        #[arg(long)]
        alg: Option<String>,
        /// Field name to leave out at every depth (repeatable)
        #[arg(long = "exclude", short = 'x')]
        exclude: Vec<String>,
        /// JSON file with digest options; flags override it
        #[arg(long)]
        config: Option<String>,
        /// Only mark true cycles as circular, not shared siblings
        #[arg(long)]
        ancestors_only: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Include the canonicalization report (implies --json)
        #[arg(long)]
        report: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Canonicalize { input, exclude } => canonicalize::run(input, exclude),
        Commands::Digest {
            input,
            alg,
            exclude,
            config,
            ancestors_only,
            json,
            report,
        } => digest::run(digest::DigestArgs {
            input,
            alg,
            exclude,
            config,
            ancestors_only,
            json,
            report,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
