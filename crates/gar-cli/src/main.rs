//! gar-cli — Command-line interface for gar-core
//!
//! This binary resolves one GAR region export into structured addresses
//! from your terminal. It supports printing or exporting the resolved
//! addresses, uploading them into Elasticsearch, printing region
//! statistics, and searching the resolved output by substring.
//!
//! Usage examples
//! --------------
//!
//! - Resolve region 77 and print JSON lines
//!   $ gar-cli resolve 77
//!
//! - Resolve and write a JSON file
//!   $ gar-cli resolve 77 --out addresses.json
//!
//! - Resolve and bulk-upload into a local Elasticsearch
//!   $ gar-cli upload 77 --url http://localhost:9200 --index fias
//!
//! - Show what a region's export contains
//!   $ gar-cli stats 77
//!
//! - Search the resolved addresses (folded, so ASCII queries hit
//!   Cyrillic names)
//!   $ gar-cli find 77 vyazovaya
//!
//! Data layout
//! -----------
//!
//! By default the CLI reads `./data`: shared dictionaries
//! (`AS_ADDR_OBJ_TYPES`, `AS_OBJECT_LEVELS`, …) at the top level and each
//! region's tables under `data/<region>/`. A binary catalog cache is
//! written next to the region directory for fast subsequent runs. Use
//! `--data-dir <path>` to point elsewhere.
mod args;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use crate::args::{CliArgs, Commands};
use gar_core::loader;
use gar_core::resolver::resolve_addresses;
use gar_core::roles::RoleCache;
use gar_core::StructuredAddress;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let data_dir = args
        .data_dir
        .unwrap_or_else(loader::default_data_dir);

    match args.command {
        Commands::Resolve { region, out } => {
            let addresses = resolve_region(&data_dir, &region)?;
            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    serde_json::to_writer_pretty(BufWriter::new(file), &addresses)?;
                    println!("{} addresses written to {}", addresses.len(), path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    for addr in &addresses {
                        serde_json::to_writer(&mut lock, addr)?;
                        lock.write_all(b"\n")?;
                    }
                }
            }
        }

        #[cfg(feature = "upload")]
        Commands::Upload { region, url, index } => {
            let addresses = resolve_region(&data_dir, &region)?;
            let sink = gar_core::sink::IndexSink::new(&url, &index)?;
            sink.ensure_index()
                .with_context(|| format!("cannot create index '{index}' at {url}"))?;

            let spinner = spinner(format!("uploading {} documents", addresses.len()));
            let shipped = sink.bulk_upload(&addresses)?;
            spinner.finish_and_clear();
            println!("{shipped} documents indexed into '{index}'");
        }

        Commands::Stats { region } => {
            let catalog = loader::load_or_build_catalog(&data_dir, &region)?;
            let links = loader::load_hierarchy(&data_dir, &region)?;
            let today = Local::now().date_naive();
            let chains = gar_core::extract_chains(&links, &catalog, today);
            let mut cache = RoleCache::new();
            for chain in &chains {
                cache.warm(chain.pattern());
            }

            let stats = catalog.stats();
            println!("Region {region}:");
            println!("  Objects: {}", stats.objects);
            println!("  Administrative units: {}", stats.admin_units);
            println!("  Buildings: {}", stats.buildings);
            println!("  Hierarchy links: {}", links.len());
            println!("  Distinct chains: {}", chains.len());
            println!("  Distinct level patterns: {}", cache.len());
        }

        Commands::Find { region, query } => {
            let addresses = resolve_region(&data_dir, &region)?;
            let matches: Vec<&StructuredAddress> = addresses
                .iter()
                .filter(|a| a.any_field_contains(&query))
                .collect();
            if matches.is_empty() {
                println!("No addresses found matching: {query}");
            } else {
                for addr in matches {
                    println!("{} — {}", addr.id, summary(addr));
                }
            }
        }
    }

    Ok(())
}

/// Load (or reuse) the region catalog, extract chains and assemble all
/// addresses, with a terminal spinner over the long phases.
fn resolve_region(data_dir: &Path, region: &str) -> anyhow::Result<Vec<StructuredAddress>> {
    let pb = spinner(format!("building catalog for region {region}"));
    let catalog = loader::load_or_build_catalog(data_dir, region)
        .with_context(|| format!("cannot load region {region}"))?;

    pb.set_message("resolving hierarchy chains");
    let links = loader::load_hierarchy(data_dir, region)?;
    let today = Local::now().date_naive();
    let addresses = resolve_addresses(&catalog, &links, today);
    pb.finish_and_clear();
    Ok(addresses)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// One-line human summary: the non-empty textual fields, comma-joined.
fn summary(addr: &StructuredAddress) -> String {
    [
        &addr.region,
        &addr.municipal,
        &addr.town,
        &addr.leftover,
        &addr.street,
        &addr.house,
        &addr.extra_house,
    ]
    .into_iter()
    .filter(|f| !f.is_empty())
    .cloned()
    .collect::<Vec<_>>()
    .join(", ")
}
