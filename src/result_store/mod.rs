//! Deduplicating JSON result tables.
//!
//! Each table is one JSON array of row objects. Merging is append-only:
//! existing rows come first, new rows after, the first row per key wins and
//! incomplete rows are dropped. Writes go to a temp file in the target
//! directory and are renamed into place, so a reader sees either the old
//! table or the new one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::StoreError;
use crate::page_extractor::{BrokerRecord, LinkRecord, ProductRecord, PropertyRecord};
use crate::page_identity::extract_page_identity;

/// A row that can live in a result table
pub trait StoreRow: Serialize + DeserializeOwned {
    /// Dedup key; `None` when the row cannot be identified
    fn key(&self) -> Option<String>;

    /// Whether the row's primary content is present
    fn has_content(&self) -> bool;

    /// Rows failing this are dropped on merge
    fn is_complete(&self) -> bool {
        self.key().is_some() && self.has_content()
    }
}

fn non_empty(key: &str) -> Option<String> {
    (!key.is_empty()).then(|| key.to_string())
}

impl StoreRow for LinkRecord {
    fn key(&self) -> Option<String> {
        non_empty(self.identity.key())
    }

    fn has_content(&self) -> bool {
        true
    }
}

impl StoreRow for ProductRecord {
    fn key(&self) -> Option<String> {
        non_empty(self.identity.key())
    }

    fn has_content(&self) -> bool {
        self.title.is_some()
    }
}

impl StoreRow for PropertyRecord {
    fn key(&self) -> Option<String> {
        let link = self.link.as_deref()?;
        non_empty(extract_page_identity(link).key())
    }

    fn has_content(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

impl StoreRow for BrokerRecord {
    fn key(&self) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }
        Some(format!("{}#{}", self.page, self.name))
    }

    fn has_content(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Merge `new` after `existing`: first occurrence per key wins, then
/// incomplete rows are dropped. Merging the same rows twice is a no-op.
#[must_use]
pub fn merge<R: StoreRow>(existing: Vec<R>, new: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(new)
        .filter(|row| row.key().is_none_or(|key| seen.insert(key)))
        .filter(StoreRow::is_complete)
        .collect()
}

/// Set `scraped` on every link whose key is in `keys`.
///
/// Returns how many rows changed.
pub fn mark_scraped(table: &mut [LinkRecord], keys: &HashSet<String>) -> usize {
    let mut changed = 0;
    for link in table.iter_mut().filter(|link| !link.scraped) {
        if keys.contains(link.identity.key()) {
            link.scraped = true;
            changed += 1;
        }
    }
    changed
}

/// A persisted table of `R` rows at one path
#[derive(Debug, Clone)]
pub struct ResultStore<R> {
    path: PathBuf,
    _rows: PhantomData<fn() -> R>,
}

impl<R: StoreRow> ResultStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _rows: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted table. A missing file is an empty table.
    pub fn load(&self) -> Result<Vec<R>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| self.corruption(e))?;
        serde_json::from_str(&raw).map_err(|e| self.corruption(e))
    }

    /// Load, merge and return the table without writing it
    pub fn merged_with(&self, new: Vec<R>) -> Result<Vec<R>, StoreError> {
        let existing = self.load()?;
        let before = existing.len();
        let merged = merge(existing, new);
        log::debug!(
            "{}: {before} existing row(s), {} after merge",
            self.path.display(),
            merged.len()
        );
        Ok(merged)
    }

    /// Load, merge and persist. Returns the number of rows written.
    ///
    /// A corrupt existing table stops the merge before anything is written.
    pub fn merge_into(&self, new: Vec<R>) -> Result<usize, StoreError> {
        let merged = self.merged_with(new)?;
        self.persist(&merged)?;
        Ok(merged.len())
    }

    /// Replace the table atomically with `rows`
    pub fn persist(&self, rows: &[R]) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| self.persist_failed(e))?;

        let mut temp_file = NamedTempFile::new_in(&parent).map_err(|e| self.persist_failed(e))?;
        serde_json::to_writer_pretty(&mut temp_file, rows).map_err(|e| self.persist_failed(e))?;
        temp_file.write_all(b"\n").map_err(|e| self.persist_failed(e))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| self.persist_failed(e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| self.persist_failed(e.error))?;

        log::info!("Wrote {} row(s) to {}", rows.len(), self.path.display());
        Ok(())
    }

    fn corruption(&self, reason: impl std::fmt::Display) -> StoreError {
        StoreError::StoreCorruption {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn persist_failed(&self, reason: impl std::fmt::Display) -> StoreError {
        StoreError::PersistFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
