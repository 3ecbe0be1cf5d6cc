//! Domain layer: query building and taxonomy logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod caml;
pub mod display;
pub mod error;
pub mod sorter;
pub mod term;
pub mod tokens;
pub mod webpart;

pub use arena::{NestedNode, NodePayload, TermInfo, TermNode, TermTree};
pub use builder::{DuplicatePathPolicy, TermTreeBuilder};
pub use caml::{build_balanced, BoolOp, Expr, OrderField};
pub use display::TreeNodeConvert;
pub use error::{DomainError, DomainResult};
pub use sorter::{sort_tree, SortMode};
pub use term::{
    parse_taxonomy_field_values, TaxonomyFieldValue, TaxonomyValue, Term, TermLabel, TermSet,
    TermStoreDocument,
};
pub use tokens::{replace_sp_tokens, PageContext, TokenPrefix};
pub use webpart::script_editor_markup;
