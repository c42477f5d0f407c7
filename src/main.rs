//! squill - analyze a parsed query tree against an index schema.

use anyhow::{Context, Result};
use clap::Parser;
use squill::analysis::{Analyzer, Schema, UnresolvedPlan};
use squill::planner::{explain, LogicalOptimizer};
use std::path::PathBuf;

/// Analyze a parsed query tree against an index schema
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the index schema (field name -> type, JSON)
    #[arg(short, long)]
    schema: PathBuf,

    /// Path to the unresolved query tree (JSON)
    #[arg(short, long)]
    query: PathBuf,

    /// Also run the logical rewriting pass and print the result
    #[arg(short, long)]
    optimize: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let schema: Schema = serde_json::from_str(
        &std::fs::read_to_string(&args.schema).context("Failed to read schema file")?,
    )
    .context("Failed to parse schema file")?;

    let unresolved: UnresolvedPlan = serde_json::from_str(
        &std::fs::read_to_string(&args.query).context("Failed to read query file")?,
    )
    .context("Failed to parse query file")?;

    let analyzer = Analyzer::new(schema);
    let logical = analyzer
        .analyze(&unresolved)
        .context("Failed to analyze query")?;

    println!("{}", explain(&logical));

    if args.optimize {
        let optimized = LogicalOptimizer::new().optimize(&logical);
        println!();
        println!("optimized:");
        println!("{}", explain(&optimized));
    }

    Ok(())
}
