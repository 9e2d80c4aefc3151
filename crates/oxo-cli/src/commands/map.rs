//! Map command - Resolve cross-references for CURIEs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use oxo_config::{ConfigOverrides, OxoConfig};
use oxo_core::{MappingQuery, MappingResult, Mappings, Targets};

use super::{open_store, print_info, resolver};
use crate::GlobalOptions;

/// Arguments for the map command
#[derive(Args, Debug)]
pub struct MapArgs {
    /// CURIEs to resolve (e.g. DOID:162)
    curies: Vec<String>,

    /// Read CURIEs from a file, one per line ("-" for stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Maximum number of hops [default: from config, normally 2]
    #[arg(long, short = 'd')]
    distance: Option<u32>,

    /// Restrict results to these ontology prefixes (repeatable or comma-separated)
    #[arg(long = "target", short = 't', value_delimiter = ',')]
    targets: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl MapArgs {
    /// `-d` and `-t` replace the `[resolver]` defaults for this run.
    fn to_config_overrides(&self) -> ConfigOverrides {
        let targets: Vec<String> = self
            .targets
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        ConfigOverrides {
            distance: self.distance,
            targets: (!targets.is_empty()).then_some(targets),
            ..Default::default()
        }
    }
}

/// Execute the map command
pub fn execute(args: MapArgs, global: &GlobalOptions, config: &OxoConfig) -> Result<()> {
    let mut sources = args.curies.clone();
    if let Some(ref input) = args.input {
        sources.extend(read_curies(input)?);
    }
    if sources.is_empty() {
        bail!("No CURIEs given (pass them as arguments or with --input)");
    }

    let mut config = config.clone();
    config.apply_overrides(&args.to_config_overrides());
    let distance = config.resolver.default_distance;
    let targets: Targets = config
        .resolver
        .default_targets
        .iter()
        .map(String::as_str)
        .collect();

    let store = open_store(&config, global.quiet)?;
    let queries: Vec<MappingQuery> = sources
        .iter()
        .map(|s| {
            MappingQuery::new(s.as_str())
                .with_distance(distance)
                .with_targets(targets.clone())
        })
        .collect();

    let results = resolver(&store, &config).resolve_many(&queries);

    if args.json {
        let report: BTreeMap<&str, &Mappings> = sources
            .iter()
            .map(String::as_str)
            .zip(results.iter())
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !targets.is_empty() {
        print_info(
            &format!(
                "Targets: {} (distance {})",
                targets.to_sorted_vec().join(", "),
                distance
            ),
            global.quiet,
        );
    }
    for (source, found) in sources.iter().zip(results.iter()) {
        if !store.contains(source) {
            print_info(
                &format!("warning: {} does not appear in any mapping", source),
                global.quiet,
            );
        }
        print_mappings(source, found);
    }

    Ok(())
}

fn read_curies(input: &Path) -> Result<Vec<String>> {
    let content = if input == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read CURIEs from stdin")?
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read CURIEs from {}", input.display()))?
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Rows ordered by distance, then CURIE.
fn sorted_rows(found: &Mappings) -> Vec<(&str, &MappingResult)> {
    let mut rows: Vec<(&str, &MappingResult)> =
        found.iter().map(|(k, v)| (k.as_str(), v)).collect();
    rows.sort_by(|a, b| a.1.distance.cmp(&b.1.distance).then(a.0.cmp(b.0)));
    rows
}

fn print_mappings(source: &str, found: &Mappings) {
    println!("{} ({} mappings)", source, found.len());

    let rows = sorted_rows(found);
    let width = rows.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
    for (curie, result) in rows {
        let mut line = format!("  {}  {:<width$}", result.distance, curie, width = width);
        if !result.label.is_empty() {
            line.push_str("  ");
            line.push_str(&result.label);
        }
        if !result.uri.is_empty() {
            line.push_str(&format!("  <{}>", result.uri));
        }
        println!("{}", line.trim_end());
    }
}
