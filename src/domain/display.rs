/*
Conversion of the arena term tree into a `termtree::Tree` for terminal display.
Defined as a trait so the display concern stays out of the arena module.
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{TermNode, TermTree};

const ROOT_LABEL: &str = "(term set)";

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(node: &TermNode) -> String {
    if node.is_selected() {
        format!("{} [selected]", node.display_title())
    } else {
        node.display_title().to_string()
    }
}

impl TreeNodeConvert for TermTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &TermTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(child));
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut root = Tree::new(ROOT_LABEL.to_string());
        build_tree(self, self.root(), &mut root);
        root
    }
}
