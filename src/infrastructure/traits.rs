//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{Term, TermStoreDocument};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Source of taxonomy terms.
pub trait TermStore: Send + Sync {
    /// All terms of a term set in enumeration order, `None` if the set is unknown.
    fn term_set(&self, id: Uuid) -> io::Result<Option<Vec<Term>>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Term store backed by a JSON export (`{"termSets": [...]}`).
pub struct JsonTermStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonTermStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<TermStoreDocument> {
        let content = self.fs.read_to_string(&self.path)?;
        let doc: TermStoreDocument = serde_json::from_str(&content)?;
        Ok(doc)
    }
}

impl TermStore for JsonTermStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn term_set(&self, id: Uuid) -> io::Result<Option<Vec<Term>>> {
        let doc = self.load()?;
        debug!("term store holds {} term sets", doc.term_sets.len());
        Ok(doc
            .term_sets
            .into_iter()
            .find(|ts| ts.id == id)
            .map(|ts| ts.terms))
    }
}

// ============================================================
// IN-MEMORY IMPLEMENTATIONS
// ============================================================

/// Term store holding a document in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryTermStore {
    doc: TermStoreDocument,
}

impl MemoryTermStore {
    pub fn new(doc: TermStoreDocument) -> Self {
        Self { doc }
    }
}

impl TermStore for MemoryTermStore {
    fn term_set(&self, id: Uuid) -> io::Result<Option<Vec<Term>>> {
        Ok(self.doc.term_set(id).map(|ts| ts.terms.clone()))
    }
}
