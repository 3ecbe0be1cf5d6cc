use std::collections::BTreeMap;

use generational_arena::{Arena, Index};
use serde::Serialize;
use tracing::instrument;

use crate::domain::term::Term;

/// Term metadata attached to the node at the end of a term's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermInfo {
    pub term: Term,
    pub title: String,
    /// String form of the term id, used for sort hints and selection
    pub guid: String,
    pub description: String,
    pub local_custom_properties: BTreeMap<String, String>,
    pub selected: bool,
}

impl TermInfo {
    pub fn new(term: Term, selected: bool) -> Self {
        Self {
            title: term.name.clone(),
            guid: term.id.to_string(),
            description: term.description.clone(),
            local_custom_properties: term.local_custom_properties.clone(),
            selected,
            term,
        }
    }
}

/// What a tree node carries besides its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePayload {
    /// Root only: every term the tree was built from, in input order
    Collection(Vec<Term>),
    /// Node where some term's path ends
    Term(TermInfo),
    /// Intermediate path segment without a term of its own
    Path,
}

impl NodePayload {
    pub fn term_info(&self) -> Option<&TermInfo> {
        match self {
            NodePayload::Term(info) => Some(info),
            _ => None,
        }
    }
}

/// Tree node in the arena-based term hierarchy.
#[derive(Debug)]
pub struct TermNode {
    /// Path segment, empty for the root
    pub name: String,
    pub payload: NodePayload,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, at most one per distinct name
    pub children: Vec<Index>,
}

impl TermNode {
    /// Title of the attached term, or the path segment when there is none.
    pub fn display_title(&self) -> &str {
        match &self.payload {
            NodePayload::Term(info) => &info.title,
            _ => &self.name,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.payload.term_info().is_some_and(|i| i.selected)
    }
}

/// Arena-based term tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// A tree always has a root carrying the input term collection.
#[derive(Debug)]
pub struct TermTree {
    arena: Arena<TermNode>,
    root: Index,
}

impl Default for TermTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TermTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TermNode {
            name: String::new(),
            payload: NodePayload::Collection(Vec::new()),
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    #[instrument(level = "trace", skip(self, payload))]
    pub fn insert_node(&mut self, name: String, payload: NodePayload, parent: Index) -> Index {
        let node = TermNode {
            name,
            payload,
            parent: Some(parent),
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TermNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TermNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TermNode {
        &self.arena[self.root]
    }

    /// Terms the tree was built from, in input order.
    pub fn source_terms(&self) -> &[Term] {
        match &self.root_node().payload {
            NodePayload::Collection(terms) => terms,
            _ => &[],
        }
    }

    pub(crate) fn push_source_term(&mut self, term: Term) {
        if let NodePayload::Collection(terms) = &mut self.arena[self.root].payload {
            terms.push(term);
        }
    }

    /// Child of `parent` named exactly `name` (case-sensitive).
    pub fn find_child(&self, parent: Index, name: &str) -> Option<Index> {
        self.get_node(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.get_node(c).is_some_and(|n| n.name == name))
    }

    /// Segment names from the root down to `idx`, following parent links.
    pub fn path_of(&self, idx: Index) -> Vec<&str> {
        let mut segments = Vec::new();
        let mut current = Some(idx);
        while let Some(node_idx) = current {
            let Some(node) = self.get_node(node_idx) else {
                break;
            };
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        segments
    }

    /// Walk from the root following `segments`.
    pub fn find_by_path(&self, segments: &[&str]) -> Option<Index> {
        segments
            .iter()
            .try_fold(self.root, |current, segment| self.find_child(current, segment))
    }

    pub fn child_names(&self, idx: Index) -> Vec<&str> {
        self.get_node(idx)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.get_node(c))
                    .map(|c| c.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root_node().children.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Levels below the root; a tree without terms has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root) - 1
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Owned nested copy of the tree, for serialization.
    pub fn to_nested(&self) -> NestedNode {
        self.nested_from(self.root)
    }

    fn nested_from(&self, idx: Index) -> NestedNode {
        let node = &self.arena[idx];
        let info = node.payload.term_info();
        NestedNode {
            name: node.name.clone(),
            title: info.map(|i| i.title.clone()),
            guid: info.map(|i| i.guid.clone()),
            description: info.map(|i| i.description.clone()),
            local_custom_properties: info
                .map(|i| i.local_custom_properties.clone())
                .unwrap_or_default(),
            selected: node.is_selected(),
            children: node
                .children
                .iter()
                .filter(|&&c| self.arena.contains(c))
                .map(|&c| self.nested_from(c))
                .collect(),
        }
    }
}

/// Serializable snapshot of a term tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub local_custom_properties: BTreeMap<String, String>,
    pub selected: bool,
    pub children: Vec<NestedNode>,
}

/// Pre-order traversal, children left to right.
pub struct TreeIterator<'a> {
    tree: &'a TermTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TermTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TermNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a TermTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a TermTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root(), false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TermNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
