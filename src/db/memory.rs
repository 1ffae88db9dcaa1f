//! In-memory compound store
//!
//! Holds a fixed set of JSON documents loaded at startup and evaluates
//! [`Filter`]s against them directly. Used for local runs from a seed file and
//! as the store behind the integration tests.

use super::CompoundStore;
use crate::{
    errors::SearchResult,
    search::{
        filter::{Field, Filter, FindOptions},
        schema::RawCompound,
    },
};
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::Value;
use std::{cmp::Ordering, path::Path, sync::Arc};
use tracing::info;

#[derive(Clone, Default)]
pub struct MemoryCompoundStore {
    documents: Arc<Vec<Value>>,
}

impl MemoryCompoundStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents: Arc::new(documents),
        }
    }

    /// Load a JSON array of compound documents
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let parsed: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Seed file {} is not valid JSON", path.display()))?;

        let Value::Array(documents) = parsed else {
            bail!("Seed file {} must contain a JSON array of documents", path.display());
        };

        info!(
            documents = documents.len(),
            path = %path.display(),
            "Loaded compound seed file"
        );

        Ok(Self::new(documents))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl CompoundStore for MemoryCompoundStore {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn find(&self, filter: &Filter, options: &FindOptions) -> SearchResult<Vec<RawCompound>> {
        let mut matched: Vec<&Value> = self
            .documents
            .iter()
            .filter(|document| matches(document, filter))
            .collect();

        matched.sort_by(|a, b| compare_names(sort_key(a), sort_key(b)));

        Ok(matched
            .into_iter()
            .take(options.limit)
            .map(RawCompound::from_document)
            .collect())
    }
}

fn sort_key(document: &Value) -> Option<&str> {
    document.get("compound_name").and_then(Value::as_str)
}

// Missing names sort first, the rest by byte order
fn compare_names(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.map(str::as_bytes).cmp(&b.map(str::as_bytes))
}

/// Evaluate a filter against one document
pub fn matches(document: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::And(terms) => terms.iter().all(|term| matches(document, term)),
        Filter::Or(terms) => terms.iter().any(|term| matches(document, term)),
        Filter::TextMatch { field, needle } => {
            let needle = needle.to_lowercase();
            field_values(document, *field).any(|value| value.to_lowercase().contains(&needle))
        }
        Filter::Equals { field, value } => field_values(document, *field).any(|v| v == value.as_str()),
    }
}

/// String values of a field; evidence fields yield one value per entry that has it
fn field_values<'a>(document: &'a Value, field: Field) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    if !field.is_evidence_field() {
        return Box::new(document.get(field.key()).and_then(Value::as_str).into_iter());
    }

    let entries = document
        .get("compounds_info")
        .and_then(Value::as_array)
        .map(|entries| entries.as_slice())
        .unwrap_or_default();

    Box::new(
        entries
            .iter()
            .filter_map(move |entry| entry.get(field.key()).and_then(Value::as_str)),
    )
}
