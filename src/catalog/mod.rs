//! Product catalog lookup.
//!
//! [`InMemoryCatalog`] loads `styles.csv` best-effort: malformed rows are
//! skipped and counted, never fatal.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::CatalogError;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

/// Placeholder for a column the catalog file does not have.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// One catalog row. Optional fields are `None` when the cell was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub article_type: Option<String>,
    pub base_color: Option<String>,
    pub gender: Option<String>,
    pub usage: Option<String>,
}

impl CatalogRecord {
    /// Record with only the required fields; descriptive fields are empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            sub_category: None,
            article_type: None,
            base_color: None,
            gender: None,
            usage: None,
        }
    }
}

/// Capability: look a catalog row up by id.
pub trait CatalogStore {
    fn lookup(&self, id: &str) -> Option<&CatalogRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: CatalogStore + ?Sized> CatalogStore for &C {
    fn lookup(&self, id: &str) -> Option<&CatalogRecord> {
        (**self).lookup(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Catalog held in memory, keyed by id. The first row for an id wins.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    records: HashMap<String, CatalogRecord>,
    skipped_rows: usize,
}

const COL_ID: &str = "id";
const COL_NAME: &str = "productDisplayName";

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    name: usize,
    category: Option<usize>,
    sub_category: Option<usize>,
    article_type: Option<usize>,
    base_color: Option<usize>,
    gender: Option<usize>,
    usage: Option<usize>,
}

impl Columns {
    fn resolve(header: &StringRecord) -> Result<Self, CatalogError> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);

        Ok(Self {
            id: find(COL_ID).ok_or(CatalogError::MissingColumn { column: COL_ID })?,
            name: find(COL_NAME).ok_or(CatalogError::MissingColumn { column: COL_NAME })?,
            category: find("masterCategory"),
            sub_category: find("subCategory"),
            article_type: find("articleType"),
            base_color: find("baseColour"),
            gender: find("gender"),
            usage: find("usage"),
        })
    }

    /// Builds a record, or `None` when the id or name cell is empty.
    fn record(&self, row: &StringRecord) -> Option<CatalogRecord> {
        let cell = |i: usize| row.get(i).map(str::trim).filter(|v| !v.is_empty());
        let optional = |col: Option<usize>| match col {
            Some(i) => cell(i).map(str::to_string),
            None => Some(UNKNOWN_FIELD.to_string()),
        };

        Some(CatalogRecord {
            id: cell(self.id)?.to_string(),
            name: cell(self.name)?.to_string(),
            category: optional(self.category),
            sub_category: optional(self.sub_category),
            article_type: optional(self.article_type),
            base_color: optional(self.base_color),
            gender: optional(self.gender),
            usage: optional(self.usage),
        })
    }
}

impl InMemoryCatalog {
    /// Builds a catalog from ready-made records.
    pub fn from_records<I: IntoIterator<Item = CatalogRecord>>(records: I) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Loads a CSV catalog from disk.
    pub fn from_csv_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = catalog.len(),
            skipped_rows = catalog.skipped_rows,
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Loads a CSV catalog with a header row.
    ///
    /// Rows with the wrong number of fields, invalid UTF-8, or an empty id or
    /// name are skipped. Columns missing from the header read as `"Unknown"`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let header = rows
            .headers()
            .map_err(|e| CatalogError::InvalidHeader {
                reason: e.to_string(),
            })?
            .clone();
        let columns = Columns::resolve(&header)?;

        let mut catalog = Self::default();
        for (line, row) in rows.records().enumerate() {
            let parsed = match row {
                Ok(row) => columns.record(&row),
                Err(e) => {
                    debug!(row = line + 1, error = %e, "Skipping malformed catalog row");
                    None
                }
            };

            match parsed {
                Some(record) => catalog.insert(record),
                None => catalog.skipped_rows += 1,
            }
        }

        if catalog.skipped_rows > 0 {
            warn!(
                skipped_rows = catalog.skipped_rows,
                "Some catalog rows could not be parsed"
            );
        }
        Ok(catalog)
    }

    fn insert(&mut self, record: CatalogRecord) {
        if self.records.contains_key(&record.id) {
            debug!(id = %record.id, "Duplicate catalog id, keeping first row");
            return;
        }
        self.records.insert(record.id.clone(), record);
    }

    /// Rows dropped while loading.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

impl CatalogStore for InMemoryCatalog {
    fn lookup(&self, id: &str) -> Option<&CatalogRecord> {
        self.records.get(id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
