// Result Normalizer - repairs stored records into the response shape
use super::schema::{CompoundRecord, RawCompound, UNNAMED_COMPOUND};
use serde_json::Value;

/// Coerce a raw record into a [`CompoundRecord`]. Never fails and never drops data
/// it can keep: an empty or missing name gets the fallback, a missing or
/// non-array `compounds_info` becomes empty.
pub fn normalize(raw: RawCompound) -> CompoundRecord {
    let compound_name = raw
        .compound_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNNAMED_COMPOUND.to_string());

    let compounds_info = match raw.compounds_info {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    };

    CompoundRecord {
        compound_name,
        compounds_info,
    }
}

pub fn normalize_all(raw: Vec<RawCompound>) -> Vec<CompoundRecord> {
    raw.into_iter().map(normalize).collect()
}
