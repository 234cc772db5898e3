//! Read-only catalog table and exact-match resolution.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::entry::CatalogEntry;
use crate::error::{PipelineError, Result};

/// Catalog loaded once and shared read-only across stars.
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    entries: Vec<CatalogEntry>,
}

impl CatalogTable {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog CSV with a header row.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::io(path, &e))?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = table.len(), "loaded catalog");
        Ok(table)
    }

    /// Parse a catalog from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let entries = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<CatalogEntry>, csv::Error>>()?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Return the unique row whose primary designation equals `name`.
    ///
    /// Matching is exact; no whitespace or case folding.
    pub fn resolve(&self, name: &str) -> Result<CatalogEntry> {
        let mut matches = self.entries.iter().filter(|e| e.hd_name == name);
        match (matches.next(), matches.count()) {
            (Some(entry), 0) => Ok(entry.clone()),
            (None, _) => Err(PipelineError::Resolution {
                name: name.to_string(),
                matches: 0,
            }),
            (Some(_), rest) => Err(PipelineError::Resolution {
                name: name.to_string(),
                matches: rest + 1,
            }),
        }
    }
}
