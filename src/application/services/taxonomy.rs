//! Taxonomy service
//!
//! Fetches a term set from the term store and turns it into a sorted term tree.

use std::sync::Arc;

use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{sort_tree, DuplicatePathPolicy, Term, TermTree, TermTreeBuilder};
use crate::infrastructure::traits::TermStore;

/// Service for reading term sets as trees.
pub struct TaxonomyService {
    store: Arc<dyn TermStore>,
    policy: DuplicatePathPolicy,
}

impl TaxonomyService {
    pub fn new(store: Arc<dyn TermStore>, policy: DuplicatePathPolicy) -> Self {
        Self { store, policy }
    }

    /// All terms of a term set, in store enumeration order.
    #[instrument(level = "debug", skip(self))]
    pub fn get_term_set(&self, id: Uuid) -> ApplicationResult<Vec<Term>> {
        match self.store.term_set(id) {
            Ok(Some(terms)) => {
                debug!("get_term_set: {} terms", terms.len());
                Ok(terms)
            }
            Ok(None) => {
                error!("cannot retrieve terms for term set {}: not found", id);
                Err(ApplicationError::TermSetNotFound(id))
            }
            Err(e) => {
                error!("cannot retrieve terms for term set {}: {}", id, e);
                Err(ApplicationError::TermStore {
                    context: format!("read term set {id}"),
                    source: e,
                })
            }
        }
    }

    /// Term set as a tree, siblings sorted at every level.
    ///
    /// `selected` marks the node of the term with that id.
    #[instrument(level = "debug", skip(self))]
    pub fn get_term_tree(&self, id: Uuid, selected: Option<Uuid>) -> ApplicationResult<TermTree> {
        let terms = self.get_term_set(id)?;
        let mut tree = TermTreeBuilder::new()
            .with_selected(selected)
            .with_duplicate_policy(self.policy)
            .build(terms)?;
        sort_tree(&mut tree);
        Ok(tree)
    }
}
