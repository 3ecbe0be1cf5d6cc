//! Sibling ordering for term trees.
//!
//! Children of a term with a custom sort order follow the order of ids in that
//! hint; everything else is ordered by title. The root holds the raw term
//! collection and keeps its input order.

use generational_arena::Index;
use tracing::{instrument, trace};

use crate::domain::arena::{NodePayload, TermNode, TermTree};
use crate::domain::term::SORT_HINT_DELIMITER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortMode {
    /// Position in the hint list; ids not listed go last
    Explicit(Vec<String>),
    Alphabetical,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Position(usize),
    Title(&'a str),
}

impl SortMode {
    pub fn for_hint(hint: Option<&str>) -> Self {
        match hint.filter(|h| !h.is_empty()) {
            Some(h) => SortMode::Explicit(h.split(SORT_HINT_DELIMITER).map(str::to_string).collect()),
            None => SortMode::Alphabetical,
        }
    }

    /// Mode for the children of `node`, `None` when they keep their order.
    fn for_node(node: &TermNode) -> Option<Self> {
        match &node.payload {
            NodePayload::Collection(_) => None,
            NodePayload::Term(info) => Some(Self::for_hint(info.term.sort_hint())),
            NodePayload::Path => Some(SortMode::Alphabetical),
        }
    }

    fn key<'a>(&self, node: &'a TermNode) -> SortKey<'a> {
        match self {
            SortMode::Explicit(ids) => {
                let guid = node.payload.term_info().map(|i| i.guid.as_str());
                let pos = guid
                    .and_then(|g| ids.iter().position(|id| id == g))
                    .unwrap_or(usize::MAX);
                SortKey::Position(pos)
            }
            SortMode::Alphabetical => SortKey::Title(node.display_title()),
        }
    }
}

/// Sort the children of every node in place and return the tree for chaining.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.len()))]
pub fn sort_tree(tree: &mut TermTree) -> &mut TermTree {
    // Each node only reorders its own children
    let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();
    for idx in order {
        sort_children(tree, idx);
    }
    tree
}

fn sort_children(tree: &mut TermTree, idx: Index) {
    let Some(node) = tree.get_node(idx) else {
        return;
    };
    if node.children.is_empty() {
        return;
    }
    let Some(mode) = SortMode::for_node(node) else {
        trace!("term collection, keeping input order");
        return;
    };

    let mut keyed: Vec<(Index, SortKey<'_>)> = node
        .children
        .iter()
        .filter_map(|&c| tree.get_node(c).map(|child| (c, mode.key(child))))
        .collect();
    // Stable: ties keep their input order
    keyed.sort_by(|a, b| a.1.cmp(&b.1));
    let sorted: Vec<Index> = keyed.into_iter().map(|(c, _)| c).collect();

    if let Some(node) = tree.get_node_mut(idx) {
        node.children = sorted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_hint_when_building_mode_then_splits_on_colon() {
        assert_eq!(
            SortMode::for_hint(Some("z:x")),
            SortMode::Explicit(vec!["z".into(), "x".into()])
        );
        assert_eq!(SortMode::for_hint(Some("")), SortMode::Alphabetical);
        assert_eq!(SortMode::for_hint(None), SortMode::Alphabetical);
    }

    #[test]
    fn given_path_nodes_when_sorting_then_orders_by_name() {
        let mut tree = TermTree::new();
        let root = tree.root();
        let parent = tree.insert_node("p".into(), NodePayload::Path, root);
        tree.insert_node("b".into(), NodePayload::Path, parent);
        tree.insert_node("a".into(), NodePayload::Path, parent);

        sort_tree(&mut tree);

        assert_eq!(tree.child_names(parent), vec!["a", "b"]);
    }
}
