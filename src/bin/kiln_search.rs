//! kiln-search: run a nearest-neighbor query against the object store
//!
//! Usage:
//!   # Near-text search with a keyword filter
//!   kiln-search --class Article "banks hedge funds predictions" \
//!       --property title --property keywords \
//!       --where-equal keywords=bonds --certainty 0.5 --limit 3
//!
//!   # Count objects per class instead of querying
//!   kiln-search --class Article --count

use anyhow::{Context, Result};
use clap::Parser;
use kiln::{GetQuery, HttpStore};

#[derive(Parser, Debug)]
#[command(name = "kiln-search")]
#[command(about = "Query a vector object store", long_about = None)]
struct Args {
    /// Search concepts for near-text matching
    concepts: Vec<String>,

    /// Base URL of the object store
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    /// Class to query
    #[arg(long)]
    class: String,

    /// Property to return (repeatable)
    #[arg(long = "property", value_name = "NAME")]
    properties: Vec<String>,

    /// Minimum certainty for near-text matches
    #[arg(long)]
    certainty: Option<f64>,

    /// Equality filter as PATH=VALUE
    #[arg(long, value_name = "PATH=VALUE")]
    where_equal: Option<String>,

    /// Maximum number of results
    #[arg(long)]
    limit: Option<usize>,

    /// Print the class object count and exit
    #[arg(long)]
    count: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let store = HttpStore::new(&args.url);

    if args.count {
        let count = store.count(&args.class)?;
        println!("{}: {count} objects", args.class);
        return Ok(());
    }

    let mut query = GetQuery::new(&args.class).with_additional("certainty");
    for property in &args.properties {
        query = query.property(property);
    }
    if !args.concepts.is_empty() {
        let concepts: Vec<&str> = args.concepts.iter().map(String::as_str).collect();
        query = query.near_text(&concepts);
    }
    if let Some(certainty) = args.certainty {
        query = query.certainty(certainty);
    }
    if let Some(filter) = &args.where_equal {
        let (path, value) = filter
            .split_once('=')
            .context("--where-equal expects PATH=VALUE")?;
        query = query.where_equal(&[path], &[value]);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }

    let response = store.query(&query)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
