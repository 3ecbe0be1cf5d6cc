//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use uuid::Uuid;

use crate::domain::{BoolOp, OrderField};

/// SharePoint Online toolbelt: balanced CAML queries, taxonomy term trees, URL tokens
#[derive(Parser, Debug)]
#[command(name = "sptoolbelt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .sptoolbelt.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render CAML query fragments
    Caml {
        #[command(subcommand)]
        command: CamlCommands,
    },

    /// Read taxonomy term sets and field values
    Taxonomy {
        #[command(subcommand)]
        command: TaxonomyCommands,
    },

    /// Replace ~site / ~sitecollection tokens using the configured page context
    Tokens {
        /// Text containing tokens
        text: String,
        /// Use #site / #sitecollection instead of ~
        #[arg(long)]
        custom: bool,
        /// Substitute server-relative URLs instead of absolute ones
        #[arg(long)]
        server_relative: bool,
    },

    /// Print Script Editor web part markup
    Webpart {
        /// Web part title
        #[arg(short, long, default_value = "Script Editor")]
        title: String,
        /// Script or HTML content
        content: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum CamlCommands {
    /// Join fragments with balanced <And>
    And {
        /// Rendered condition fragments
        fragments: Vec<String>,
    },
    /// Join fragments with balanced <Or>
    Or {
        /// Rendered condition fragments
        fragments: Vec<String>,
    },
    /// Join fragments with a combinator given at runtime
    Combine {
        /// And | Or
        op: BoolOp,
        /// Rendered condition fragments
        fragments: Vec<String>,
    },
    /// Single comparison, e.g. Eq, Neq, Contains, Geq
    Condition {
        #[arg(long)]
        op: String,
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
        /// Value type (default from config, usually Text)
        #[arg(long)]
        value_type: Option<String>,
    },
    /// <IsNull> on a field
    IsNull { field: String },
    /// <IsNotNull> on a field
    IsNotNull { field: String },
    /// Filter on the item ID
    ById { id: i64 },
    /// Filter a lookup field by the looked-up item id
    ByLookup { field: String, id: i64 },
    /// <ViewFields> for the given fields
    ViewFields {
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// <OrderBy>; append :desc for descending
    OrderBy {
        #[arg(required = true)]
        fields: Vec<OrderField>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaxonomyCommands {
    /// Print a term set as a sorted tree
    Tree {
        /// Term set id
        term_set: Uuid,
        /// JSON term store export (default: taxonomy.term_store)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        store: Option<PathBuf>,
        /// Term id to mark as selected
        #[arg(long)]
        selected: Option<Uuid>,
        /// Print nested JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Flatten a taxonomy field value (object or array) into id/label lines
    Values {
        /// JSON file holding the field value
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
