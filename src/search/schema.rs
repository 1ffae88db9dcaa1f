// Compound Schema - stored document shape and the normalized response shape
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display name used when a stored record has no usable name
pub const UNNAMED_COMPOUND: &str = "Unnamed Compound";

/// A compound record exactly as the store returned it.
///
/// Legacy rows may lack a name or carry something other than an array in
/// `compounds_info`, so both fields stay loose until normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RawCompound {
    #[serde(default)]
    pub compound_name: Option<String>,
    #[serde(default)]
    pub compounds_info: Option<Value>,
}

impl RawCompound {
    /// Read a raw record out of an arbitrary JSON document.
    ///
    /// A non-string `compound_name` is treated as missing.
    pub fn from_document(document: &Value) -> Self {
        Self {
            compound_name: document
                .get("compound_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            compounds_info: document.get("compounds_info").cloned(),
        }
    }
}

/// A compound record in its guaranteed response shape.
///
/// Evidence entries are passed through untouched: `title`, `text_block`,
/// `evidence_description`, `evidence_type`, `disease_targeted` and the optional
/// `confidence_score`, `file_name`, `structure`, `identifier`,
/// `mechanism_of_action`, `references`, `manual_validation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub compound_name: String,
    pub compounds_info: Vec<Value>,
}
