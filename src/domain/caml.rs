//! CAML query fragments and the balanced boolean-expression builder.
//!
//! Leaf renderers produce opaque condition strings. `and`/`or` combine them
//! into a balanced binary tree so that long filter lists stay shallow.

use std::fmt;
use std::str::FromStr;

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Value type used by `condition` when the caller does not name one.
pub const DEFAULT_VALUE_TYPE: &str = "Text";

/// Boolean combinator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn tag(&self) -> &'static str {
        match self {
            BoolOp::And => "And",
            BoolOp::Or => "Or",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BoolOp {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(BoolOp::And),
            "or" => Ok(BoolOp::Or),
            _ => Err(DomainError::InvalidBoolOp(s.to_string())),
        }
    }
}

/// Node of a boolean expression: an opaque leaf or a two-child combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Leaf(String),
    Combinator {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn leaf(fragment: impl Into<String>) -> Self {
        Expr::Leaf(fragment.into())
    }

    /// Number of combinator levels above the deepest leaf. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Leaf(_) => 0,
            Expr::Combinator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Leaf(s) => out.push(s.as_str()),
                Expr::Combinator { left, right, .. } => {
                    // Push right first for left-to-right order
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Leaf(s) => f.write_str(s),
            Expr::Combinator { op, left, right } => {
                write!(f, "<{op}>{left}{right}</{op}>")
            }
        }
    }
}

/// Combine `fragments` into a balanced tree of `op` combinators.
///
/// The sequence is cut at `ceil(n/2)`, both halves are built recursively and
/// joined only when both produced something. A single element is returned
/// unwrapped; an empty sequence yields `None`.
#[instrument(level = "trace", skip(fragments), fields(n = fragments.len()))]
pub fn build_balanced(op: BoolOp, mut fragments: Vec<Expr>) -> Option<Expr> {
    match fragments.len() {
        0 => None,
        1 => fragments.pop(),
        n => {
            let cut = n.div_ceil(2);
            let right_half = fragments.split_off(cut);
            let left = build_balanced(op, fragments);
            let right = build_balanced(op, right_half);
            match (left, right) {
                (Some(left), Some(right)) => Some(Expr::Combinator {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }),
                (left, right) => left.or(right),
            }
        }
    }
}

/// Render a balanced `op` expression over string fragments.
///
/// Empty fragments are dropped before building.
pub fn combine<I, S>(op: BoolOp, fragments: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let leaves: Vec<Expr> = fragments
        .into_iter()
        .filter(|f| !f.as_ref().is_empty())
        .map(|f| Expr::leaf(f.as_ref()))
        .collect();
    build_balanced(op, leaves).map(|e| e.to_string())
}

pub fn and<I, S>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    combine(BoolOp::And, fragments)
}

pub fn or<I, S>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    combine(BoolOp::Or, fragments)
}

/// `<Op><FieldRef Name='F'/><Value Type='T'>V</Value></Op>`
pub fn condition(op: &str, field: &str, value: &str, value_type: Option<&str>) -> String {
    format!(
        "<{op}><FieldRef Name='{field}'/><Value Type='{}'>{value}</Value></{op}>",
        value_type.unwrap_or(DEFAULT_VALUE_TYPE)
    )
}

pub fn contains(field: &str, value: &str, value_type: Option<&str>) -> String {
    condition("Contains", field, value, value_type)
}

pub fn is_null(field: &str) -> String {
    format!("<IsNull><FieldRef Name='{field}'/></IsNull>")
}

pub fn is_not_null(field: &str) -> String {
    format!("<IsNotNull><FieldRef Name='{field}'/></IsNotNull>")
}

pub fn filter_by_id(id: i64) -> String {
    condition("Eq", "ID", &id.to_string(), Some("Counter"))
}

pub fn filter_by_lookup_id(field: &str, id: i64) -> String {
    format!("<Eq><FieldRef Name='{field}' LookupId='true' /><Value Type='Lookup'>{id}</Value></Eq>")
}

pub fn wrap_view_fields<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let refs: String = fields
        .into_iter()
        .map(|f| format!("<FieldRef Name='{}'/>", f.as_ref()))
        .collect();
    format!("<ViewFields>{refs}</ViewFields>")
}

/// Sort key for `wrap_order_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderField {
    pub name: String,
    pub descending: bool,
}

impl OrderField {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: true,
        }
    }
}

impl FromStr for OrderField {
    type Err = String;

    /// `Name` or `Name:desc` / `Name:asc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            None => Ok(OrderField::asc(s)),
            Some((name, dir)) if dir.eq_ignore_ascii_case("desc") => Ok(OrderField::desc(name)),
            Some((name, dir)) if dir.eq_ignore_ascii_case("asc") => Ok(OrderField::asc(name)),
            Some((_, dir)) => Err(format!("unknown sort direction: {dir}")),
        }
    }
}

pub fn wrap_order_by(fields: &[OrderField]) -> String {
    let refs: String = fields
        .iter()
        .map(|f| {
            let dir = if f.descending { " Ascending='FALSE'" } else { "" };
            format!("<FieldRef Name='{}'{dir}/>", f.name)
        })
        .collect();
    format!("<OrderBy>{refs}</OrderBy>")
}
