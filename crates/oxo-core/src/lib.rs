//! OxO Core - Ontology cross-reference resolution
//!
//! This crate provides the core functionality for resolving mappings between
//! biomedical ontology identifiers (CURIEs):
//! - An immutable identifier-equivalence graph with term metadata
//! - Bounded, prefix-filtered breadth-first resolution over that graph
//! - Ingestion of the terms and mapping tables that feed the graph

pub mod curie;
pub mod loader;
pub mod resolver;
pub mod store;

// Re-exports for convenience
pub use curie::{local_id, prefix, Targets};
pub use loader::{load_store, read_mappings, read_terms, DataFiles, LoadError};
pub use resolver::{
    MappingQuery, MappingResolver, MappingResult, Mappings, DEFAULT_DISTANCE,
    DEFAULT_PARALLEL_THRESHOLD,
};
pub use store::{MappingStore, MappingStoreBuilder, StoreStats, TermMetadata};
