//! CURIE helpers and target-prefix filtering.
//!
//! CURIEs are opaque, case-sensitive strings of the form `PREFIX:LOCAL_ID`.
//! Only the prefix is ever interpreted: it names the ontology that owns the
//! identifier and drives result filtering in the resolver.

use std::collections::HashSet;

/// Separator between a CURIE's prefix and its local identifier.
pub const PREFIX_SEPARATOR: char = ':';

/// Ontology prefix of a CURIE: everything before the first `:`.
///
/// A string with no separator is its own prefix. Local ids may contain further
/// colons (`GO:GO:0008150`); they never contribute to the prefix.
pub fn prefix(curie: &str) -> &str {
    match curie.find(PREFIX_SEPARATOR) {
        Some(pos) => &curie[..pos],
        None => curie,
    }
}

/// Local identifier of a CURIE: everything after the first `:`.
pub fn local_id(curie: &str) -> Option<&str> {
    curie
        .find(PREFIX_SEPARATOR)
        .map(|pos| &curie[pos + PREFIX_SEPARATOR.len_utf8()..])
}

/// Set of ontology prefixes that results are restricted to.
///
/// An empty set places no restriction on results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    prefixes: HashSet<String>,
}

impl Targets {
    /// No restriction: every prefix is accepted.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-delimited list such as `"MeSH, UMLS"`.
    ///
    /// Whitespace around items is trimmed and empty items are dropped.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Whether results are unrestricted.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Whether a CURIE with `prefix` may be reported.
    pub fn accepts(&self, prefix: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.contains(prefix)
    }

    /// Prefixes in sorted order.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = self.prefixes.iter().cloned().collect();
        prefixes.sort();
        prefixes
    }
}

impl<S: Into<String>> FromIterator<S> for Targets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            prefixes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for Targets {
    fn from(prefix: &str) -> Self {
        std::iter::once(prefix).collect()
    }
}

impl From<String> for Targets {
    fn from(prefix: String) -> Self {
        std::iter::once(prefix).collect()
    }
}

impl From<Vec<String>> for Targets {
    fn from(prefixes: Vec<String>) -> Self {
        prefixes.into_iter().collect()
    }
}

impl From<&[&str]> for Targets {
    fn from(prefixes: &[&str]) -> Self {
        prefixes.iter().copied().collect()
    }
}

impl<S: Into<String>> From<Option<S>> for Targets {
    fn from(prefix: Option<S>) -> Self {
        prefix.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_basic() {
        assert_eq!(prefix("DOID:162"), "DOID");
        assert_eq!(prefix("UMLS:C0002199"), "UMLS");
    }

    #[test]
    fn test_prefix_takes_first_separator_only() {
        assert_eq!(prefix("GO:GO:0008150"), "GO");
        assert_eq!(local_id("GO:GO:0008150"), Some("GO:0008150"));
    }

    #[test]
    fn test_prefix_without_separator() {
        assert_eq!(prefix("orphan"), "orphan");
        assert_eq!(local_id("orphan"), None);
        assert_eq!(prefix(""), "");
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_ne!(prefix("MeSH:D001"), prefix("MESH:D001"));
    }

    #[test]
    fn test_empty_prefix() {
        assert_eq!(prefix(":123"), "");
    }

    #[test]
    fn test_targets_any_accepts_everything() {
        let targets = Targets::any();
        assert!(targets.is_empty());
        assert!(targets.accepts("MeSH"));
        assert!(targets.accepts(""));
    }

    #[test]
    fn test_targets_single_prefix() {
        let targets = Targets::from("MeSH");
        assert_eq!(targets.len(), 1);
        assert!(targets.accepts("MeSH"));
        assert!(!targets.accepts("UMLS"));
    }

    #[test]
    fn test_targets_collection_deduplicates() {
        let targets = Targets::from(vec![
            "MeSH".to_string(),
            "UMLS".to_string(),
            "MeSH".to_string(),
        ]);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.to_sorted_vec(), vec!["MeSH", "UMLS"]);
    }

    #[test]
    fn test_targets_from_option() {
        assert!(Targets::from(None::<String>).is_empty());
        assert!(Targets::from(Some("DOID")).contains("DOID"));
    }

    #[test]
    fn test_parse_list() {
        let targets = Targets::parse_list(" MeSH, UMLS ,,");
        assert_eq!(targets.to_sorted_vec(), vec!["MeSH", "UMLS"]);
        assert!(Targets::parse_list("").is_empty());
    }
}
