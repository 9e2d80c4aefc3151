//! Stats command - Summarize the loaded mapping tables

use anyhow::Result;
use clap::Args;
use oxo_config::OxoConfig;
use oxo_core::StoreStats;

use super::open_store;
use crate::GlobalOptions;

/// Arguments for the stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Number of prefixes to list (0 = all)
    #[arg(long, default_value = "15")]
    top: usize,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the stats command
pub fn execute(args: StatsArgs, global: &GlobalOptions, config: &OxoConfig) -> Result<()> {
    let store = open_store(config, global.quiet)?;
    let stats = store.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Mapping Statistics");
    println!("==================");
    println!("CURIEs:   {}", stats.node_count);
    println!("Mappings: {}", stats.edge_count);
    println!("Terms:    {}", stats.term_count);

    println!("\nCURIEs by prefix:");
    for (prefix, count) in top_prefixes(&stats, args.top) {
        println!("  {:<16} {}", prefix, count);
    }

    Ok(())
}

/// Prefixes ordered by node count (descending), then name.
fn top_prefixes(stats: &StoreStats, limit: usize) -> Vec<(&str, usize)> {
    let mut prefixes: Vec<(&str, usize)> = stats
        .nodes_by_prefix
        .iter()
        .map(|(p, c)| (p.as_str(), *c))
        .collect();
    prefixes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if limit > 0 {
        prefixes.truncate(limit);
    }
    prefixes
}
