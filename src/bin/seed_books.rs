//! Generate a CSV of synthetic books for loading into the `books` table.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use libris_server::seed::{write_csv, BookGenerator};

#[derive(Parser, Debug)]
#[command(name = "seed-books", version, about = "Generate synthetic book records as CSV")]
struct Args {
    /// Number of books to generate
    #[arg(long, default_value_t = 10_000)]
    count: usize,

    /// Output file
    #[arg(long, default_value = "books_data.csv")]
    output: PathBuf,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_books=info,libris_server=info".into()),
        )
        .init();

    let args = Args::parse();

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let records = BookGenerator::new(rng).take(args.count);
    let written = write_csv(BufWriter::new(file), records)
        .with_context(|| format!("writing {}", args.output.display()))?;

    tracing::info!("Wrote {} books to {}", written, args.output.display());

    print_preview(&args.output)?;

    Ok(())
}

/// Header plus the first five rows
fn print_preview(path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    for line in content.lines().take(6) {
        println!("{}", line);
    }
    Ok(())
}
