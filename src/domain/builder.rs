//! Tree builder assembling flat path-carrying terms into a term tree.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::domain::arena::{NodePayload, TermInfo, TermTree};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::term::{Term, PATH_DELIMITER};

/// What to do when a term's full path ends on a node that already carries a term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum DuplicatePathPolicy {
    /// Keep the payload of the term seen first
    #[default]
    FirstWins,
    /// Replace the payload with the term seen last
    LastWins,
    /// Fail the build
    Reject,
}

impl fmt::Display for DuplicatePathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DuplicatePathPolicy::FirstWins => "first-wins",
            DuplicatePathPolicy::LastWins => "last-wins",
            DuplicatePathPolicy::Reject => "reject",
        };
        f.write_str(s)
    }
}

impl FromStr for DuplicatePathPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-wins" => Ok(DuplicatePathPolicy::FirstWins),
            "last-wins" => Ok(DuplicatePathPolicy::LastWins),
            "reject" => Ok(DuplicatePathPolicy::Reject),
            _ => Err(DomainError::InvalidPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for DuplicatePathPolicy {
    type Error = DomainError;

    fn try_from(s: String) -> DomainResult<Self> {
        s.parse()
    }
}

/// Constructs a term tree from terms in store enumeration order.
#[derive(Debug, Clone, Default)]
pub struct TermTreeBuilder {
    selected_id: Option<Uuid>,
    policy: DuplicatePathPolicy,
}

impl TermTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the term with this id as selected.
    pub fn with_selected(mut self, selected_id: Option<Uuid>) -> Self {
        self.selected_id = selected_id;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePathPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a tree whose structure mirrors the distinct path prefixes of `terms`.
    ///
    /// Terms are consumed one at a time. Each path is walked from the root,
    /// reusing a child with the same segment name or creating it. The term's
    /// metadata lands on the node of its last segment.
    #[instrument(level = "debug", skip(self, terms))]
    pub fn build<I>(&self, terms: I) -> DomainResult<TermTree>
    where
        I: IntoIterator<Item = Term>,
    {
        let mut tree = TermTree::new();

        for term in terms {
            let segments: Vec<String> = term.path_segments().map(str::to_string).collect();
            let last = segments.len() - 1;
            let mut current = tree.root();

            for (i, segment) in segments.iter().enumerate() {
                let is_last = i == last;
                match tree.find_child(current, segment) {
                    Some(existing) => {
                        if is_last {
                            self.attach_existing(&mut tree, existing, &term)?;
                        }
                        current = existing;
                    }
                    None => {
                        let payload = if is_last {
                            NodePayload::Term(self.term_info(&term))
                        } else {
                            NodePayload::Path
                        };
                        trace!(segment = %segment, is_last, "creating node");
                        current = tree.insert_node(segment.clone(), payload, current);
                    }
                }
            }

            tree.push_source_term(term);
        }

        debug!(
            terms = tree.source_terms().len(),
            nodes = tree.len(),
            "term tree built"
        );
        Ok(tree)
    }

    fn term_info(&self, term: &Term) -> TermInfo {
        TermInfo::new(term.clone(), self.selected_id == Some(term.id))
    }

    fn attach_existing(
        &self,
        tree: &mut TermTree,
        idx: Index,
        term: &Term,
    ) -> DomainResult<()> {
        let info = self.term_info(term);
        let delimiter = PATH_DELIMITER.to_string();
        let path = tree.path_of(idx).join(delimiter.as_str());
        let Some(node) = tree.get_node_mut(idx) else {
            return Ok(());
        };
        let has_term = matches!(node.payload, NodePayload::Term(_));
        match (has_term, self.policy) {
            (true, DuplicatePathPolicy::FirstWins) => {
                debug!(path = %path, id = %term.id, "duplicate path, keeping first term");
            }
            (true, DuplicatePathPolicy::Reject) => {
                return Err(DomainError::DuplicateTermPath { path });
            }
            // Intermediate node gets its own term, or last writer replaces
            _ => node.payload = NodePayload::Term(info),
        }
        Ok(())
    }
}
