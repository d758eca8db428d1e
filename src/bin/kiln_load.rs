//! kiln-load: load newline-delimited flat records into an object store
//!
//! Usage:
//!   # Load NDJSON records into a local store
//!   kiln-load records.jsonl --url http://localhost:8080
//!
//!   # Read from stdin
//!   cat records.jsonl | kiln-load
//!
//!   # Fan out comma-joined author lists before loading
//!   kiln-load records.jsonl --explode author_name
//!
//!   # Replace the store's schema, then load
//!   kiln-load records.jsonl --init-schema schema.json
//!
//!   # Dry run against a schema file, printing submission counts
//!   kiln-load records.jsonl --dry-run --schema schema.json

use anyhow::{Context, Result};
use clap::Parser;
use kiln::{explode, GraphLoader, HttpStore, MemoryStore, ObjectStore};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};

#[derive(Parser, Debug)]
#[command(name = "kiln-load")]
#[command(about = "Load flat records into a vector object store", long_about = None)]
struct Args {
    /// Input NDJSON file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Base URL of the object store
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    /// How many pending operations the store buffers before submitting
    #[arg(long, default_value_t = 30)]
    batch_size: usize,

    /// Fan this comma-joined field out into one record per value
    #[arg(long, value_name = "FIELD")]
    explode: Option<String>,

    /// Load into an in-memory store and print counts instead of submitting
    #[arg(long, requires = "schema")]
    dry_run: bool,

    /// Schema document for --dry-run
    #[arg(long, value_name = "FILE")]
    schema: Option<String>,

    /// Replace the store's schema with this document before loading.
    /// Drops every existing class and its objects.
    #[arg(long, value_name = "FILE", conflicts_with = "dry_run")]
    init_schema: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    if args.dry_run {
        let Some(path) = &args.schema else {
            anyhow::bail!("--dry-run requires --schema");
        };
        let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
        let schema: Value =
            serde_json::from_reader(BufReader::new(file)).context("Failed to parse schema")?;

        let mut store = MemoryStore::new(schema);
        let loaded = run(reader, &mut store, &args)?;
        println!(
            "{} records -> {} objects, {} references (dry run)",
            loaded,
            store.objects().len(),
            store.references().len()
        );
    } else {
        let mut store = HttpStore::new(&args.url);
        if let Some(path) = &args.init_schema {
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            let schema: Value =
                serde_json::from_reader(BufReader::new(file)).context("Failed to parse schema")?;
            store.delete_schema()?;
            store.create_schema(&schema)?;
        }
        let loaded = run(reader, &mut store, &args)?;
        println!("{loaded} records loaded");
    }

    Ok(())
}

fn run<S: ObjectStore>(reader: Box<dyn BufRead>, store: &mut S, args: &Args) -> Result<usize> {
    let mut loader = GraphLoader::new(store, args.batch_size)?;
    let mut loaded = 0;

    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).context("Failed to parse JSON")?;
        let record = value
            .as_object()
            .context("Expected one JSON object per line")?;

        match &args.explode {
            Some(field) => {
                for expanded in explode(record, field, ',') {
                    loader.load(&expanded)?;
                }
            }
            None => loader.load(record)?,
        }
        loaded += 1;
    }

    loader.finish()?;
    Ok(loaded)
}
