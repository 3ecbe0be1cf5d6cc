//! SharePoint Online toolbelt.
//!
//! Pure helpers behind SharePoint page customizations: balanced CAML query
//! building, taxonomy term trees with custom sort orders, URL token
//! replacement and Script Editor web part markup.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
