// SPDX-License-Identifier: CC0-1.0

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{info, warn};

use share_consensus::{Config, Document, Report, recover};

const DEFAULT_MAX_COMBINATIONS: u64 = 1_000_000;

#[derive(Parser)]
#[clap(name = "share-consensus")]
#[clap(version)]
#[clap(about = "CLI tool to recover threshold-shared secrets from possibly corrupted shares.", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recovers the secret of one or more share documents
    Recover(RecoverArgs),
    /// Prints the decimal value of a numeral written in the given base
    Decode(DecodeArgs),
}

#[derive(Args)]
struct RecoverArgs {
    /// JSON share documents
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Print each report as JSON
    #[arg(long)]
    json: bool,
    /// Fail instead of picking the smallest secret when candidates tie
    #[arg(long, env = "SHARE_CONSENSUS_STRICT")]
    strict: bool,
    /// Refuse documents that need more combinations than this
    #[arg(long, default_value_t = DEFAULT_MAX_COMBINATIONS, env = "SHARE_CONSENSUS_MAX_COMBINATIONS")]
    max_combinations: u64,
}

#[derive(Args)]
struct DecodeArgs {
    /// Digits to decode
    value: String,
    /// Base of the digits (2-36)
    #[arg(short, long, default_value_t = 10)]
    base: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "share_consensus=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recover(args) => handle_recover(args),
        Commands::Decode(args) => handle_decode(args),
    }
}

fn handle_recover(args: RecoverArgs) -> Result<()> {
    let config = Config {
        strict: args.strict,
        max_combinations: Some(u128::from(args.max_combinations)),
    };

    for path in &args.files {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let doc = Document::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!(file = %path.display(), n = doc.keys.n, k = doc.keys.k, "recovering secret");
        let result = recover(&doc, &config)
            .with_context(|| format!("Failed to recover secret from {}", path.display()))?;

        if !result.wrong_shares.is_empty() {
            warn!(
                file = %path.display(),
                wrong = result.wrong_shares.len(),
                "inconsistent shares detected"
            );
        }

        let report = Report::from(&result);
        if args.json {
            println!("{}", report.to_json().context("Failed to serialize report")?);
        } else {
            if args.files.len() > 1 {
                println!("== {}", path.display());
            }
            print!("{report}");
        }
    }

    Ok(())
}

fn handle_decode(args: DecodeArgs) -> Result<()> {
    let value = share_consensus::share_numeral::decode(&args.value, args.base)
        .with_context(|| format!("Failed to decode '{}' in base {}", args.value, args.base))?;

    println!("{value}");

    Ok(())
}
