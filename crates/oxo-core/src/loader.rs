//! Table ingestion for the Mapping Store.
//!
//! Three comma-delimited tables feed the store: a terms table
//! `(identifier, curie, label, uri, prefix)` and one or more edge tables whose
//! first two columns are `(curie_from, curie_to)`. Every table starts with a
//! header row. Quoted fields use `"`, quotes are never doubled, `\` escapes,
//! and records end in CRLF (bare LF is tolerated).
//!
//! Loading is all-or-nothing: any malformed or missing table aborts with a
//! [`LoadError`] instead of producing a partial graph. Before tokenizing, each
//! table is scanned once to number its rows by physical line and to reject
//! two inputs the `csv` reader would otherwise accept with a different
//! meaning: blank rows (silently skipped) and `\` outside a quoted field
//! (kept as a literal, so `A:x\,y` would split into the wrong edge).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{MappingStore, MappingStoreBuilder};

/// Number of columns in a terms table row.
pub const TERMS_COLUMNS: usize = 5;

/// Minimum number of columns in an edge table row.
pub const MAPPING_MIN_COLUMNS: usize = 2;

// ============================================================================
// Errors
// ============================================================================

/// Data load failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Table could not be opened
    #[error("failed to open table '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table could not be read or tokenized
    #[error("failed to read table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// Table could not be read into memory
    #[error("failed to read table '{table}': {source}")]
    Read {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// A `\` escape appears outside a quoted field
    #[error("table '{table}' line {line}: escape character outside a quoted field")]
    UnquotedEscape { table: String, line: u64 },

    /// A row with no fields
    #[error("table '{table}' line {line}: blank row")]
    BlankRow { table: String, line: u64 },

    /// Table has no header row
    #[error("table '{table}' is empty (missing header row)")]
    MissingHeader { table: String },

    /// A row has the wrong number of fields
    #[error("table '{table}' line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        table: String,
        line: u64,
        expected: String,
        found: usize,
    },
}

impl LoadError {
    fn csv(table: &str, source: csv::Error) -> Self {
        Self::Csv {
            table: table.to_string(),
            source,
        }
    }

    fn field_count(table: &str, line: u64, record: &StringRecord, expected: String) -> Self {
        Self::FieldCount {
            table: table.to_string(),
            line,
            expected,
            found: record.len(),
        }
    }
}

// ============================================================================
// Data Files
// ============================================================================

/// Locations of the tables that make up a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    /// Terms table (label/URI metadata)
    pub terms: PathBuf,
    /// Edge tables, ingested in order
    pub mappings: Vec<PathBuf>,
}

impl DataFiles {
    pub fn new(terms: impl Into<PathBuf>) -> Self {
        Self {
            terms: terms.into(),
            mappings: Vec::new(),
        }
    }

    pub fn with_mapping(mut self, path: impl Into<PathBuf>) -> Self {
        self.mappings.push(path.into());
        self
    }
}

// ============================================================================
// Row Scan
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    RecordStart,
    FieldStart,
    Unquoted,
    Quoted,
    QuotedEscape,
}

/// Starting line (1-based) of every data row, header excluded.
///
/// Follows the same dialect as [`reader_builder`]: a field is quoted only
/// when it opens with `"`, `\` escapes the next byte inside quotes, and
/// `\r\n`, `\n` or a lone `\r` ends a record outside quotes.
fn scan_rows(data: &[u8], table: &str) -> Result<Vec<u64>, LoadError> {
    let mut starts = Vec::new();
    let mut state = ScanState::RecordStart;
    let mut line: u64 = 1;
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        if state == ScanState::RecordStart {
            if b == b'\r' || b == b'\n' {
                return Err(LoadError::BlankRow {
                    table: table.to_string(),
                    line,
                });
            }
            starts.push(line);
            state = ScanState::FieldStart;
        }

        match state {
            ScanState::FieldStart | ScanState::Unquoted => match b {
                b'"' if state == ScanState::FieldStart => state = ScanState::Quoted,
                b'\\' => {
                    return Err(LoadError::UnquotedEscape {
                        table: table.to_string(),
                        line,
                    })
                }
                b',' => state = ScanState::FieldStart,
                b'\r' | b'\n' => {
                    if b == b'\r' && data.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line += 1;
                    state = ScanState::RecordStart;
                }
                _ => state = ScanState::Unquoted,
            },
            ScanState::Quoted => match b {
                b'\\' => state = ScanState::QuotedEscape,
                // Text after the closing quote is read literally up to the delimiter
                b'"' => state = ScanState::Unquoted,
                b'\n' => line += 1,
                _ => {}
            },
            ScanState::QuotedEscape => {
                if b == b'\n' {
                    line += 1;
                }
                state = ScanState::Quoted;
            }
            ScanState::RecordStart => {}
        }
        i += 1;
    }

    // First record is the header
    if !starts.is_empty() {
        starts.remove(0);
    }
    Ok(starts)
}

fn read_all<R: Read>(mut input: R, table: &str) -> Result<Vec<u8>, LoadError> {
    let mut data = Vec::new();
    input
        .read_to_end(&mut data)
        .map_err(|source| LoadError::Read {
            table: table.to_string(),
            source,
        })?;
    Ok(data)
}

// ============================================================================
// Readers
// ============================================================================

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b',')
        .quote(b'"')
        .double_quote(false)
        .escape(Some(b'\\'))
        .terminator(Terminator::CRLF)
        .has_headers(true)
        .flexible(true);
    builder
}

fn row_line(lines: &[u64], row: usize) -> u64 {
    lines.get(row).copied().unwrap_or(0)
}

fn check_header<R: Read>(reader: &mut csv::Reader<R>, table: &str) -> Result<(), LoadError> {
    let header = reader.headers().map_err(|e| LoadError::csv(table, e))?;
    if header.is_empty() {
        return Err(LoadError::MissingHeader {
            table: table.to_string(),
        });
    }
    Ok(())
}

/// Ingest a terms table into `builder`, returning the number of rows read.
///
/// `table` names the source in error messages.
pub fn read_terms<R: Read>(
    input: R,
    table: &str,
    builder: &mut MappingStoreBuilder,
) -> Result<usize, LoadError> {
    let data = read_all(input, table)?;
    let lines = scan_rows(&data, table)?;
    let mut reader = reader_builder().from_reader(data.as_slice());
    check_header(&mut reader, table)?;

    let mut rows = 0;
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| LoadError::csv(table, e))?
    {
        if record.len() != TERMS_COLUMNS {
            return Err(LoadError::field_count(
                table,
                row_line(&lines, rows),
                &record,
                TERMS_COLUMNS.to_string(),
            ));
        }
        // identifier and prefix columns are not used
        builder.add_term(&record[1], &record[2], &record[3]);
        rows += 1;
    }

    info!("Loaded {} terms from {}", rows, table);
    Ok(rows)
}

/// Ingest an edge table into `builder`, returning the number of rows read.
pub fn read_mappings<R: Read>(
    input: R,
    table: &str,
    builder: &mut MappingStoreBuilder,
) -> Result<usize, LoadError> {
    let data = read_all(input, table)?;
    let lines = scan_rows(&data, table)?;
    let mut reader = reader_builder().from_reader(data.as_slice());
    check_header(&mut reader, table)?;

    let mut rows = 0;
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| LoadError::csv(table, e))?
    {
        if record.len() < MAPPING_MIN_COLUMNS {
            return Err(LoadError::field_count(
                table,
                row_line(&lines, rows),
                &record,
                format!("at least {}", MAPPING_MIN_COLUMNS),
            ));
        }
        builder.add_mapping(&record[0], &record[1]);
        rows += 1;
    }

    info!("Loaded {} mappings from {}", rows, table);
    Ok(rows)
}

fn open(path: &Path) -> Result<File, LoadError> {
    debug!("Opening table {:?}", path);
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Build a store from the tables named in `files`.
pub fn load_store(files: &DataFiles) -> Result<MappingStore, LoadError> {
    let start = std::time::Instant::now();
    let mut builder = MappingStore::builder();

    let terms_name = files.terms.display().to_string();
    read_terms(open(&files.terms)?, &terms_name, &mut builder)?;

    for path in &files.mappings {
        let name = path.display().to_string();
        read_mappings(open(path)?, &name, &mut builder)?;
    }

    let store = builder.build();
    info!(
        "Mapping store ready: {} CURIEs, {} mappings, {} terms in {:.2?}",
        store.node_count(),
        store.edge_count(),
        store.term_count(),
        start.elapsed()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TERMS: &str = "identifier,curie,label,uri,prefix\r\n\
        162,DOID:162,\"cancer\",\"http://purl.obolibrary.org/obo/DOID_162\",DOID\r\n\
        C0006826,UMLS:C0006826,\"Malignant Neoplasms\",\"\",UMLS\r\n";

    #[test]
    fn test_read_terms() {
        let mut builder = MappingStore::builder();
        let rows = read_terms(TERMS.as_bytes(), "terms", &mut builder).unwrap();
        assert_eq!(rows, 2);

        let store = builder.build();
        let term = store.metadata("DOID:162").unwrap();
        assert_eq!(term.label, "cancer");
        assert_eq!(term.uri, "http://purl.obolibrary.org/obo/DOID_162");
        assert_eq!(store.metadata("UMLS:C0006826").unwrap().uri, "");
    }

    #[test]
    fn test_read_terms_escaped_quote_and_comma() {
        let input = "identifier,curie,label,uri,prefix\r\n\
            1,X:1,\"Say \\\"hi\\\", then go\",\"u\",X\r\n";
        let mut builder = MappingStore::builder();
        read_terms(input.as_bytes(), "terms", &mut builder).unwrap();

        let store = builder.build();
        assert_eq!(store.metadata("X:1").unwrap().label, "Say \"hi\", then go");
    }

    fn field_count_line(input: &str) -> u64 {
        let mut builder = MappingStore::builder();
        match read_terms(input.as_bytes(), "terms.csv", &mut builder).unwrap_err() {
            LoadError::FieldCount { table, line, found, .. } => {
                assert_eq!(table, "terms.csv");
                assert_eq!(found, 3);
                line
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_terms_wrong_field_count() {
        assert_eq!(
            field_count_line("identifier,curie,label,uri,prefix\r\n1,X:1,label\r\n"),
            2
        );
        assert_eq!(
            field_count_line("identifier,curie,label,uri,prefix\n1,X:1,label\n"),
            2
        );
    }

    #[test]
    fn test_field_count_line_after_good_rows() {
        let crlf = "identifier,curie,label,uri,prefix\r\n\
            1,X:1,\"one\",\"u\",X\r\n\
            2,X:2,label\r\n";
        assert_eq!(field_count_line(crlf), 3);

        let lf = crlf.replace("\r\n", "\n");
        assert_eq!(field_count_line(&lf), 3);
    }

    #[test]
    fn test_field_count_line_counts_newlines_in_quotes() {
        let input = "identifier,curie,label,uri,prefix\r\n\
            1,X:1,\"two\r\nlines\",\"u\",X\r\n\
            2,X:2,label\r\n";
        assert_eq!(field_count_line(input), 4);
    }

    #[test]
    fn test_unquoted_escape_is_rejected() {
        let input = "curie_from,curie_to\r\nA:1,B:1\r\nA:x\\,y,B:1\r\n";
        let mut builder = MappingStore::builder();
        let err = read_mappings(input.as_bytes(), "ols", &mut builder).unwrap_err();

        match err {
            LoadError::UnquotedEscape { table, line } => {
                assert_eq!(table, "ols");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_escape_after_closing_quote_is_rejected() {
        let input = "curie_from,curie_to\r\n\"A:1\"x\\,B:1\r\n";
        let mut builder = MappingStore::builder();
        let err = read_mappings(input.as_bytes(), "ols", &mut builder).unwrap_err();
        assert!(matches!(err, LoadError::UnquotedEscape { line: 2, .. }));
    }

    #[test]
    fn test_quoted_escaped_delimiter_stays_in_field() {
        let input = "curie_from,curie_to\r\n\"A:x\\,y\",B:1\r\n";
        let mut builder = MappingStore::builder();
        read_mappings(input.as_bytes(), "ols", &mut builder).unwrap();

        let store = builder.build();
        assert!(store.contains("A:x,y"));
        assert!(store.neighbors("B:1").contains("A:x,y"));
    }

    #[test]
    fn test_blank_row_is_rejected() {
        let input = "curie_from,curie_to\r\nA:1,B:1\r\n\r\nB:1,C:1\r\n";
        let mut builder = MappingStore::builder();
        let err = read_mappings(input.as_bytes(), "ols", &mut builder).unwrap_err();
        assert!(matches!(err, LoadError::BlankRow { line: 3, .. }));
        assert!(err.to_string().contains("blank row"));
    }

    #[test]
    fn test_trailing_blank_line_is_rejected() {
        let input = "curie_from,curie_to\nA:1,B:1\n\n";
        let mut builder = MappingStore::builder();
        let err = read_mappings(input.as_bytes(), "ols", &mut builder).unwrap_err();
        assert!(matches!(err, LoadError::BlankRow { line: 3, .. }));
    }

    #[test]
    fn test_last_row_without_terminator() {
        let input = "curie_from,curie_to\r\nA:1,B:1";
        let mut builder = MappingStore::builder();
        assert_eq!(read_mappings(input.as_bytes(), "ols", &mut builder).unwrap(), 1);
    }

    #[test]
    fn test_read_mappings_ignores_extra_columns() {
        let input = "curie_from,curie_to,source,scope\r\n\
            DOID:162,UMLS:C0006826,ols,EXACT\r\n\
            DOID:162,MeSH:D009369\r\n";
        let mut builder = MappingStore::builder();
        let rows = read_mappings(input.as_bytes(), "ols", &mut builder).unwrap();
        assert_eq!(rows, 2);

        let store = builder.build();
        assert_eq!(store.neighbors("DOID:162").len(), 2);
        assert!(store.neighbors("MeSH:D009369").contains("DOID:162"));
    }

    #[test]
    fn test_read_mappings_short_row() {
        let input = "curie_from,curie_to\r\nDOID:162\r\n";
        let mut builder = MappingStore::builder();
        let err = read_mappings(input.as_bytes(), "ols", &mut builder).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_tolerates_bare_lf() {
        let input = "curie_from,curie_to\nA:1,B:1\nB:1,C:1\n";
        let mut builder = MappingStore::builder();
        assert_eq!(read_mappings(input.as_bytes(), "lf", &mut builder).unwrap(), 2);
    }

    #[test]
    fn test_empty_table_is_error() {
        let mut builder = MappingStore::builder();
        let err = read_mappings("".as_bytes(), "empty", &mut builder).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { .. }));
    }

    #[test]
    fn test_header_only_table_is_ok() {
        let mut builder = MappingStore::builder();
        let rows = read_mappings("curie_from,curie_to\r\n".as_bytes(), "h", &mut builder).unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_missing_file() {
        let files = DataFiles::new("/nonexistent/oxo/terms.csv");
        let err = load_store(&files).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("terms.csv"));
    }
}
