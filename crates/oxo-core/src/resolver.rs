//! Mapping Resolver: bounded, prefix-filtered breadth-first search.
//!
//! Starting from a source CURIE, the resolver expands the equivalence graph
//! one level at a time for at most `distance` levels and reports every
//! neighbor it observes, subject to two reporting filters:
//!
//! - CURIEs sharing the source's prefix are never reported.
//! - When targets are given, only CURIEs whose prefix is a target are reported.
//!
//! Neither filter affects traversal: filtered nodes are still expanded, so a
//! search can pass through same-ontology or non-target intermediates to reach
//! farther mappings. A CURIE keeps the distance of the level at which it was
//! first observed.
//!
//! ## Usage
//!
//! ```ignore
//! use oxo_core::{MappingQuery, MappingResolver};
//!
//! let resolver = MappingResolver::new(&store);
//! let found = resolver.resolve(&MappingQuery::new("DOID:162").with_targets("MeSH"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::curie::{self, Targets};
use crate::store::MappingStore;

/// Number of levels expanded when no distance is given.
pub const DEFAULT_DISTANCE: u32 = 2;

/// Frontier size at which neighbor collection switches to rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

// ============================================================================
// Query and Results
// ============================================================================

/// One reported mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    /// BFS level at which the CURIE was first observed (>= 1)
    pub distance: u32,
    /// Term label, empty when unknown
    pub label: String,
    /// Term URI, empty when unknown
    pub uri: String,
}

/// Resolution output keyed by discovered CURIE.
pub type Mappings = BTreeMap<String, MappingResult>;

/// Parameters for a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingQuery {
    pub source: String,
    pub distance: u32,
    pub targets: Targets,
}

impl MappingQuery {
    /// Query with the default distance and no target restriction.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            distance: DEFAULT_DISTANCE,
            targets: Targets::any(),
        }
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_targets(mut self, targets: impl Into<Targets>) -> Self {
        self.targets = targets.into();
        self
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Runs bounded searches against a shared, immutable [`MappingStore`].
#[derive(Debug, Clone, Copy)]
pub struct MappingResolver<'a> {
    store: &'a MappingStore,
    parallel_threshold: usize,
}

impl<'a> MappingResolver<'a> {
    pub fn new(store: &'a MappingStore) -> Self {
        Self {
            store,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Frontier size at which a level is expanded on the rayon pool.
    /// Values below 1 are treated as 1.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn store(&self) -> &'a MappingStore {
        self.store
    }

    /// Shorthand for `resolve(&MappingQuery { .. })`.
    pub fn find_mappings(
        &self,
        source: &str,
        distance: u32,
        targets: impl Into<Targets>,
    ) -> Mappings {
        self.resolve(
            &MappingQuery::new(source)
                .with_distance(distance)
                .with_targets(targets),
        )
    }

    /// Resolve one query.
    pub fn resolve(&self, query: &MappingQuery) -> Mappings {
        let source = query.source.as_str();
        let source_prefix = curie::prefix(source);

        let mut found = Mappings::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut frontier: HashSet<&str> = HashSet::from([source]);

        for level in 1..=query.distance {
            visited.extend(frontier.iter().copied());

            // Gathered on the rayon pool for wide frontiers, reduced here.
            // Every insertion in a level records the same distance.
            let expansions = self.expand(&frontier);

            let mut next: HashSet<&str> = HashSet::new();
            for neighbors in expansions {
                for m in neighbors {
                    if !visited.contains(m) {
                        next.insert(m);
                    }
                    if found.contains_key(m) {
                        continue;
                    }
                    let p = curie::prefix(m);
                    if p != source_prefix && query.targets.accepts(p) {
                        found.insert(m.to_string(), self.result_for(m, level));
                    }
                }
            }

            debug!(
                source,
                depth = level,
                frontier = frontier.len(),
                next = next.len(),
                found = found.len(),
                "Expanded level"
            );

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        trace!(source, found = found.len(), "Resolution complete");
        found
    }

    /// Resolve independent queries in parallel.
    ///
    /// Results are returned in query order.
    pub fn resolve_many(&self, queries: &[MappingQuery]) -> Vec<Mappings> {
        queries.par_iter().map(|q| self.resolve(q)).collect()
    }

    fn expand(&self, frontier: &HashSet<&str>) -> Vec<BTreeSet<&'a str>> {
        if frontier.len() >= self.parallel_threshold {
            frontier
                .par_iter()
                .map(|n| self.store.neighbors(n))
                .collect()
        } else {
            frontier.iter().map(|n| self.store.neighbors(n)).collect()
        }
    }

    fn result_for(&self, curie: &str, distance: u32) -> MappingResult {
        match self.store.metadata(curie) {
            Some(term) => MappingResult {
                distance,
                label: term.label.clone(),
                uri: term.uri.clone(),
            },
            None => MappingResult {
                distance,
                label: String::new(),
                uri: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain() -> MappingStore {
        let mut builder = MappingStore::builder();
        builder
            .add_mapping("A:1", "B:1")
            .add_mapping("B:1", "C:1")
            .add_mapping("C:1", "D:1")
            .add_mapping("A:1", "A:2")
            .add_term("C:1", "Sea", "http://example.org/C_1");
        builder.build()
    }

    fn keys(mappings: &Mappings) -> Vec<&str> {
        mappings.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_chain_default_distance() {
        let store = chain();
        let found = MappingResolver::new(&store).resolve(&MappingQuery::new("A:1"));

        assert_eq!(keys(&found), vec!["B:1", "C:1"]);
        assert_eq!(found["B:1"].distance, 1);
        assert_eq!(found["C:1"].distance, 2);
    }

    #[test]
    fn test_metadata_and_fallback() {
        let store = chain();
        let found = MappingResolver::new(&store).find_mappings("A:1", 2, Targets::any());

        assert_eq!(found["C:1"].label, "Sea");
        assert_eq!(found["C:1"].uri, "http://example.org/C_1");
        assert_eq!(found["B:1"].label, "");
        assert_eq!(found["B:1"].uri, "");
    }

    #[test]
    fn test_zero_distance_is_empty() {
        let store = chain();
        let found = MappingResolver::new(&store).find_mappings("A:1", 0, Targets::any());
        assert!(found.is_empty());
    }

    #[test]
    fn test_target_filter() {
        let store = chain();
        let found = MappingResolver::new(&store).find_mappings("A:1", 2, "C");

        assert_eq!(keys(&found), vec!["C:1"]);
        assert_eq!(found["C:1"].distance, 2);
    }

    #[test]
    fn test_same_prefix_never_reported() {
        let store = chain();
        let found = MappingResolver::new(&store).find_mappings("A:1", 5, Targets::any());

        assert!(!found.contains_key("A:2"));
        assert!(!found.contains_key("A:1"));
        assert_eq!(keys(&found), vec!["B:1", "C:1", "D:1"]);
    }

    #[test]
    fn test_unknown_source() {
        let store = chain();
        let found = MappingResolver::new(&store).find_mappings("Z:404", 3, Targets::any());
        assert!(found.is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut builder = MappingStore::builder();
        for i in 0..200 {
            builder.add_mapping("HUB:0", &format!("L1:{i}"));
            builder.add_mapping(&format!("L1:{i}"), &format!("L2:{}", i % 37));
        }
        let store = builder.build();
        let query = MappingQuery::new("HUB:0").with_distance(3);

        let sequential = MappingResolver::new(&store)
            .with_parallel_threshold(usize::MAX)
            .resolve(&query);
        let parallel = MappingResolver::new(&store)
            .with_parallel_threshold(1)
            .resolve(&query);

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 237);
    }

    #[test]
    fn test_resolve_many_preserves_order() {
        let store = chain();
        let resolver = MappingResolver::new(&store);
        let queries = vec![
            MappingQuery::new("D:1").with_distance(1),
            MappingQuery::new("A:1").with_distance(1),
        ];

        let results = resolver.resolve_many(&queries);
        assert_eq!(results.len(), 2);
        assert_eq!(keys(&results[0]), vec!["C:1"]);
        assert_eq!(keys(&results[1]), vec!["B:1"]);
    }

    #[test]
    fn test_result_serializes() {
        let result = MappingResult {
            distance: 1,
            label: "cancer".to_string(),
            uri: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"distance": 1, "label": "cancer", "uri": ""})
        );
    }
}
