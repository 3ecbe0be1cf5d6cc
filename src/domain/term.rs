//! Taxonomy entities: terms, term sets and taxonomy field values

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between segments of `Term::path_of_term`.
pub const PATH_DELIMITER: char = ';';

/// Separator between ids of `Term::custom_sort_order`.
pub const SORT_HINT_DELIMITER: char = ':';

/// A node of a controlled vocabulary, as delivered by the term store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: Uuid,
    pub name: String,
    /// Segment names from the term set root down to this term, `;`-delimited
    pub path_of_term: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub local_custom_properties: BTreeMap<String, String>,
    /// Ordered child ids, `:`-delimited. Orders this term's children, not the term itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_sort_order: Option<String>,
}

impl Term {
    pub fn new(id: Uuid, name: impl Into<String>, path_of_term: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path_of_term: path_of_term.into(),
            description: String::new(),
            local_custom_properties: BTreeMap::new(),
            custom_sort_order: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.custom_sort_order = Some(sort_order.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.local_custom_properties.insert(key.into(), value.into());
        self
    }

    /// Path segments in root-to-term order. Always yields at least one segment.
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path_of_term.split(PATH_DELIMITER)
    }

    /// Explicit child order, `None` when absent or empty.
    pub fn sort_hint(&self) -> Option<&str> {
        self.custom_sort_order.as_deref().filter(|s| !s.is_empty())
    }
}

/// A term set and all of its terms, in store enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSet {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub terms: Vec<Term>,
}

/// On-disk export of a term store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermStoreDocument {
    #[serde(default)]
    pub term_sets: Vec<TermSet>,
}

impl TermStoreDocument {
    pub fn term_set(&self, id: Uuid) -> Option<&TermSet> {
        self.term_sets.iter().find(|ts| ts.id == id)
    }
}

/// Value of a managed-metadata list field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyFieldValue {
    pub term_guid: String,
    pub label: String,
}

/// Single- or multi-valued managed-metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyValue {
    Single(TaxonomyFieldValue),
    Collection(Vec<TaxonomyFieldValue>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermLabel {
    pub id: String,
    pub label: String,
}

impl From<&TaxonomyFieldValue> for TermLabel {
    fn from(v: &TaxonomyFieldValue) -> Self {
        Self {
            id: v.term_guid.clone(),
            label: v.label.clone(),
        }
    }
}

/// Flatten a field value into `(id, label)` pairs. A missing value yields nothing.
pub fn parse_taxonomy_field_values(value: Option<&TaxonomyValue>) -> Vec<TermLabel> {
    match value {
        None => Vec::new(),
        Some(TaxonomyValue::Single(v)) => vec![TermLabel::from(v)],
        Some(TaxonomyValue::Collection(vs)) => vs.iter().map(TermLabel::from).collect(),
    }
}
