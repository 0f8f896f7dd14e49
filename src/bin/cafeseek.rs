//! Query a café corpus from the command line.
//!
//! Usage:
//!     cargo run --bin cafeseek -- --keywords keywords.json --records cafes.json "安靜 插座"
//!
//! Reads a JSON keyword configuration and a JSON array of records, ranks the
//! corpus against the query, and prints the hits (optionally with hashtags).

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cafeseek::hashtags::HashtagOptions;
use cafeseek::{CorpusStore, KeywordCatalog};

#[derive(Parser)]
#[command(name = "cafeseek", about = "Rank café listings against a query")]
struct Args {
    /// Keyword configuration file (JSON array of {term, weight, category})
    #[arg(long)]
    keywords: String,

    /// Records file (JSON array of café documents)
    #[arg(long)]
    records: String,

    /// Free-text query; empty ranks by keyword richness alone
    #[arg(default_value = "")]
    query: String,

    /// Maximum hits to print
    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// Rescale printed scores to 0-100
    #[arg(long)]
    normalize: bool,

    /// Print a hashtag summary per hit
    #[arg(long)]
    hashtags: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let catalog = KeywordCatalog::load(&args.keywords)
        .with_context(|| format!("loading keywords from {}", args.keywords))?;
    let inputs = CorpusStore::load_inputs(&args.records)
        .with_context(|| format!("loading records from {}", args.records))?;
    let store = CorpusStore::with_records(catalog, inputs);

    let mut results = cafeseek::ranking::rank(
        &args.query,
        store.corpus().cafes(),
        store.catalog(),
    );
    if args.normalize {
        cafeseek::ranking::normalize_scores(&mut results);
    }

    if results.is_empty() {
        println!("no matches");
        return Ok(());
    }

    for (rank, result) in results.iter().take(args.limit).enumerate() {
        let cafe = &result.cafe;
        println!(
            "{:>3}. [{:>7.2}] {}  ({})",
            rank + 1,
            result.score,
            cafe.name,
            cafe.district
        );
        if args.hashtags {
            let tags = cafeseek::hashtags::generate_hashtags(
                &cafe.searchable_text,
                store.catalog(),
                &args.query,
                &HashtagOptions::default(),
            );
            if !tags.is_empty() {
                println!("     {tags}");
            }
        }
    }
    Ok(())
}
