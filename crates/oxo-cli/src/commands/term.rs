//! Term command - Show a single CURIE and its direct mappings

use anyhow::Result;
use clap::Args;
use oxo_config::OxoConfig;
use oxo_core::{local_id, prefix, MappingStore};
use serde::Serialize;

use super::open_store;
use crate::GlobalOptions;

/// Arguments for the term command
#[derive(Args, Debug)]
pub struct TermArgs {
    /// CURIE to show
    curie: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// What the store knows about one CURIE
#[derive(Debug, Serialize)]
struct TermReport<'a> {
    curie: &'a str,
    prefix: &'a str,
    local_id: Option<&'a str>,
    label: Option<&'a str>,
    uri: Option<&'a str>,
    in_graph: bool,
    neighbors: Vec<&'a str>,
}

impl<'a> TermReport<'a> {
    fn new(store: &'a MappingStore, curie: &'a str) -> Self {
        let term = store.metadata(curie);
        Self {
            curie,
            prefix: prefix(curie),
            local_id: local_id(curie),
            label: term.map(|t| t.label.as_str()),
            uri: term.map(|t| t.uri.as_str()),
            in_graph: store.contains(curie),
            neighbors: store.neighbors(curie).into_iter().collect(),
        }
    }
}

/// Execute the term command
pub fn execute(args: TermArgs, global: &GlobalOptions, config: &OxoConfig) -> Result<()> {
    let store = open_store(config, global.quiet)?;
    let report = TermReport::new(&store, &args.curie);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Term: {}", report.curie);
    println!("  Prefix: {}", report.prefix);
    println!("  Local ID: {}", report.local_id.unwrap_or("(none)"));
    println!("  Label: {}", report.label.unwrap_or("(none)"));
    println!("  URI: {}", report.uri.unwrap_or("(none)"));

    if !report.in_graph {
        println!("  Not present in any mapping table");
        return Ok(());
    }

    println!("  Direct mappings ({}):", report.neighbors.len());
    for neighbor in &report.neighbors {
        match store.metadata(neighbor) {
            Some(term) if !term.label.is_empty() => println!("    {}  {}", neighbor, term.label),
            _ => println!("    {}", neighbor),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_for_known_term() {
        let mut builder = MappingStore::builder();
        builder
            .add_mapping("DOID:162", "MeSH:D009369")
            .add_term("DOID:162", "cancer", "http://purl.obolibrary.org/obo/DOID_162");
        let store = builder.build();

        let report = TermReport::new(&store, "DOID:162");
        assert_eq!(report.prefix, "DOID");
        assert_eq!(report.local_id, Some("162"));
        assert_eq!(report.label, Some("cancer"));
        assert!(report.in_graph);
        assert_eq!(report.neighbors, vec!["MeSH:D009369"]);
    }

    #[test]
    fn test_report_for_unknown_term() {
        let store = MappingStore::builder().build();
        let report = TermReport::new(&store, "X:1");

        assert!(!report.in_graph);
        assert!(report.label.is_none());
        assert!(report.neighbors.is_empty());
    }
}
