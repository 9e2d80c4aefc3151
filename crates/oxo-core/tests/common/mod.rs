//! Common test utilities for integration tests.
//!
//! Provides in-memory graph fixtures and paths to the sample tables under
//! `tests/fixtures/tables`.

#![allow(dead_code)]

use std::path::PathBuf;

use oxo_core::{DataFiles, MappingStore};

/// Directory holding the sample CSV tables.
pub fn tables_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tables")
}

/// Sample tables: one terms table plus the OLS and UMLS edge tables.
pub fn sample_files() -> DataFiles {
    let dir = tables_dir();
    DataFiles::new(dir.join("terms.csv"))
        .with_mapping(dir.join("ols_mappings.csv"))
        .with_mapping(dir.join("umls_mappings.csv"))
}

/// Build a store from `(from, to)` pairs with no term metadata.
pub fn store_from_edges(edges: &[(&str, &str)]) -> MappingStore {
    let mut builder = MappingStore::builder();
    for (from, to) in edges {
        builder.add_mapping(from, to);
    }
    builder.build()
}

/// `A:1 - B:1 - C:1 - D:1` plus a same-prefix branch `A:1 - A:2`.
pub fn chain_store() -> MappingStore {
    store_from_edges(&[
        ("A:1", "B:1"),
        ("B:1", "C:1"),
        ("C:1", "D:1"),
        ("A:1", "A:2"),
    ])
}

/// A small multi-ontology graph with branches, a cycle and metadata on some
/// nodes.
pub fn mesh_store() -> MappingStore {
    let mut builder = MappingStore::builder();
    for (from, to) in [
        ("DOID:1", "UMLS:1"),
        ("DOID:1", "MeSH:1"),
        ("UMLS:1", "MeSH:1"),
        ("UMLS:1", "SNOMEDCT:1"),
        ("SNOMEDCT:1", "ICD10:1"),
        ("ICD10:1", "MeSH:2"),
        ("MeSH:2", "DOID:2"),
        ("DOID:2", "EFO:1"),
        ("EFO:1", "UMLS:2"),
        ("UMLS:2", "UMLS:1"),
        ("NCIT:1", "NCIT:1"),
        ("NCIT:1", "DOID:1"),
    ] {
        builder.add_mapping(from, to);
    }
    builder
        .add_term("UMLS:1", "Neoplasm", "http://identifiers.org/umls/1")
        .add_term("MeSH:1", "Neoplasms", "http://identifiers.org/mesh/1");
    builder.build()
}
