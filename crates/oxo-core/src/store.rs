//! Mapping Store: the identifier-equivalence graph and term metadata.
//!
//! The store is built once through [`MappingStoreBuilder`] and is immutable
//! afterwards. All lookups take `&self`, so a built store can be shared across
//! threads (for example behind an `Arc`) without any locking.
//!
//! The graph is backed by `petgraph` with a string-id index for O(1) node
//! lookup. Edges are undirected and collapse on duplicates, so each node's
//! adjacency behaves as a set.

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::curie;

// ============================================================================
// Term Metadata
// ============================================================================

/// Human-readable metadata attached to a CURIE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMetadata {
    /// Preferred label of the term
    pub label: String,
    /// Canonical URI of the term
    pub uri: String,
}

impl TermMetadata {
    pub fn new(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Summary counts for a built store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// CURIEs that appear in at least one mapping
    pub node_count: usize,
    /// Distinct undirected mappings
    pub edge_count: usize,
    /// CURIEs with label/URI metadata
    pub term_count: usize,
    /// Graph nodes per ontology prefix
    pub nodes_by_prefix: BTreeMap<String, usize>,
}

// ============================================================================
// Builder
// ============================================================================

/// Single-writer construction phase for a [`MappingStore`].
#[derive(Debug, Default)]
pub struct MappingStoreBuilder {
    graph: UnGraph<String, ()>,
    node_index_map: HashMap<String, NodeIndex>,
    terms: HashMap<String, TermMetadata>,
}

impl MappingStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record label and URI for a CURIE. A later call for the same CURIE
    /// replaces the earlier metadata.
    pub fn add_term(
        &mut self,
        curie: impl Into<String>,
        label: impl Into<String>,
        uri: impl Into<String>,
    ) -> &mut Self {
        self.terms
            .insert(curie.into(), TermMetadata::new(label, uri));
        self
    }

    /// Add an undirected mapping between two CURIEs.
    ///
    /// Adding the same pair again (in either orientation) is a no-op.
    pub fn add_mapping(&mut self, from: &str, to: &str) -> &mut Self {
        let a = self.intern(from);
        let b = self.intern(to);
        self.graph.update_edge(a, b, ());
        self
    }

    /// Number of distinct CURIEs seen in mappings so far.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct mappings added so far.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of CURIEs with metadata so far.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Finish construction.
    pub fn build(self) -> MappingStore {
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            terms = self.terms.len(),
            "Mapping store built"
        );
        MappingStore {
            graph: self.graph,
            node_index_map: self.node_index_map,
            terms: self.terms,
        }
    }

    fn intern(&mut self, curie: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index_map.get(curie) {
            return idx;
        }
        let idx = self.graph.add_node(curie.to_string());
        self.node_index_map.insert(curie.to_string(), idx);
        idx
    }
}

// ============================================================================
// Mapping Store
// ============================================================================

/// Immutable equivalence graph over CURIEs plus term metadata.
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    graph: UnGraph<String, ()>,

    /// Map from CURIE to petgraph NodeIndex for O(1) lookup
    node_index_map: HashMap<String, NodeIndex>,

    terms: HashMap<String, TermMetadata>,
}

impl MappingStore {
    /// Start building a new store.
    pub fn builder() -> MappingStoreBuilder {
        MappingStoreBuilder::new()
    }

    /// CURIEs directly mapped to `curie`.
    ///
    /// An unknown CURIE has no neighbors; this is not an error.
    pub fn neighbors(&self, curie: &str) -> BTreeSet<&str> {
        let Some(&idx) = self.node_index_map.get(curie) else {
            return BTreeSet::new();
        };

        self.graph
            .neighbors(idx)
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Label and URI for `curie`, if the terms table listed it.
    pub fn metadata(&self, curie: &str) -> Option<&TermMetadata> {
        self.terms.get(curie)
    }

    /// Whether `curie` appears in any mapping.
    pub fn contains(&self, curie: &str) -> bool {
        self.node_index_map.contains_key(curie)
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Iterate over every CURIE in the graph.
    pub fn iter_curies(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Collect summary statistics.
    pub fn stats(&self) -> StoreStats {
        let mut nodes_by_prefix: BTreeMap<String, usize> = BTreeMap::new();
        for curie in self.iter_curies() {
            *nodes_by_prefix
                .entry(curie::prefix(curie).to_string())
                .or_insert(0) += 1;
        }

        StoreStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            term_count: self.term_count(),
            nodes_by_prefix,
        }
    }
}
