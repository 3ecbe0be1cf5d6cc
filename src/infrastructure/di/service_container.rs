//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::TaxonomyService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, JsonTermStore, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding shared settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Taxonomy service over a JSON term store.
    ///
    /// `store_path` overrides `taxonomy.term_store` from the settings.
    pub fn taxonomy_service(&self, store_path: Option<&Path>) -> InfraResult<TaxonomyService> {
        let path = store_path
            .map(Path::to_path_buf)
            .or_else(|| self.settings.taxonomy.term_store.clone())
            .ok_or(InfraError::MissingTermStore)?;

        if !self.fs.exists(&path) {
            return Err(InfraError::io(
                format!("term store {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            ));
        }

        let store = JsonTermStore::new(Arc::clone(&self.fs), path);
        Ok(TaxonomyService::new(
            Arc::new(store),
            self.settings.taxonomy.duplicate_paths,
        ))
    }
}
