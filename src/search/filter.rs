//! Query builder
//!
//! Turns the optional request parameters into a [`Filter`], a storage-agnostic
//! expression that each [`CompoundStore`](crate::db::CompoundStore) knows how to
//! execute.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of records a search returns
pub const RESULT_LIMIT: usize = 20;

/// Searchable fields of a compound record.
///
/// Everything except [`Field::CompoundName`] lives on the evidence entries in
/// `compounds_info`; a condition on such a field holds if any entry satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    CompoundName,
    Title,
    TextBlock,
    EvidenceDescription,
    EvidenceType,
    DiseaseTargeted,
    ConfidenceScore,
}

impl Field {
    /// Fields covered by the free-text query
    pub const TEXT_SEARCHABLE: [Field; 5] = [
        Field::CompoundName,
        Field::Title,
        Field::TextBlock,
        Field::EvidenceDescription,
        Field::DiseaseTargeted,
    ];

    /// Key of the field inside its document (the record or an evidence entry)
    pub fn key(self) -> &'static str {
        match self {
            Field::CompoundName => "compound_name",
            Field::Title => "title",
            Field::TextBlock => "text_block",
            Field::EvidenceDescription => "evidence_description",
            Field::EvidenceType => "evidence_type",
            Field::DiseaseTargeted => "disease_targeted",
            Field::ConfidenceScore => "confidence_score",
        }
    }

    pub fn is_evidence_field(self) -> bool {
        !matches!(self, Field::CompoundName)
    }

    /// Dotted document path, e.g. `compounds_info.title`
    pub fn path(self) -> String {
        if self.is_evidence_field() {
            format!("compounds_info.{}", self.key())
        } else {
            self.key().to_string()
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Filter expression over compound records.
///
/// `TextMatch` is a case-insensitive substring test where the needle is always
/// taken literally; stores must escape it for their own pattern syntax.
/// `Equals` is exact, case-sensitive string equality. An empty `And` matches
/// everything, an empty `Or` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    TextMatch { field: Field, needle: String },
    Equals { field: Field, value: String },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Filter that matches every record
    pub fn all() -> Self {
        Filter::And(Vec::new())
    }

    pub fn matches_all(&self) -> bool {
        matches!(self, Filter::And(terms) if terms.is_empty())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::TextMatch { field, needle } => write!(f, "{} ~* {:?}", field, needle),
            Filter::Equals { field, value } => write!(f, "{} = {:?}", field, value),
            Filter::And(terms) if terms.is_empty() => f.write_str("TRUE"),
            Filter::Or(terms) if terms.is_empty() => f.write_str("FALSE"),
            Filter::And(terms) => write_joined(f, terms, " AND "),
            Filter::Or(terms) => write_joined(f, terms, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Filter], separator: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", term)?;
    }
    f.write_str(")")
}

/// Sort and limit applied alongside a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    /// Always ascending by `compound_name`
    pub limit: usize,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self { limit: RESULT_LIMIT }
    }
}

/// Raw search parameters as they arrive on the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub evidence_type: Option<String>,
    pub disease: Option<String>,
    pub confidence_score: Option<String>,
}

impl SearchParams {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Collect parameters from decoded query-string pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "evidenceType" => &mut params.evidence_type,
                "disease" => &mut params.disease,
                "confidenceScore" => &mut params.confidence_score,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// Free-text query, `None` when absent or empty
    pub fn text_query(&self) -> Option<&str> {
        present(&self.query)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Build the filter for a set of search parameters.
///
/// Empty strings count as absent. The text query becomes one OR-group over the
/// text-searchable fields and is ANDed with the equality filters.
pub fn build_filter(params: &SearchParams) -> Filter {
    let mut terms = Vec::new();

    if let Some(query) = params.text_query() {
        terms.push(Filter::Or(
            Field::TEXT_SEARCHABLE
                .iter()
                .map(|&field| Filter::TextMatch {
                    field,
                    needle: query.to_string(),
                })
                .collect(),
        ));
    }

    let equalities = [
        (Field::EvidenceType, &params.evidence_type),
        (Field::DiseaseTargeted, &params.disease),
        (Field::ConfidenceScore, &params.confidence_score),
    ];
    for (field, value) in equalities {
        if let Some(value) = present(value) {
            terms.push(Filter::Equals {
                field,
                value: value.to_string(),
            });
        }
    }

    if terms.len() == 1 {
        terms.remove(0)
    } else {
        Filter::And(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_group(needle: &str) -> Filter {
        Filter::Or(
            Field::TEXT_SEARCHABLE
                .iter()
                .map(|&field| Filter::TextMatch {
                    field,
                    needle: needle.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn no_parameters_match_everything() {
        let filter = build_filter(&SearchParams::default());
        assert!(filter.matches_all());
        assert_eq!(filter.to_string(), "TRUE");
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let params = SearchParams {
            query: Some(String::new()),
            evidence_type: Some(String::new()),
            disease: Some(String::new()),
            confidence_score: Some(String::new()),
        };
        assert_eq!(build_filter(&params), Filter::all());
    }

    #[test]
    fn query_alone_is_a_single_or_group() {
        let filter = build_filter(&SearchParams::with_query("aspirin"));
        assert_eq!(filter, text_group("aspirin"));
    }

    #[test]
    fn text_group_covers_the_five_text_fields() {
        let paths: Vec<String> = Field::TEXT_SEARCHABLE.iter().map(|f| f.path()).collect();
        assert_eq!(
            paths,
            vec![
                "compound_name",
                "compounds_info.title",
                "compounds_info.text_block",
                "compounds_info.evidence_description",
                "compounds_info.disease_targeted",
            ]
        );
    }

    #[test]
    fn disease_alone_is_a_single_equality() {
        let params = SearchParams {
            query: Some(String::new()),
            disease: Some("Cancer".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_filter(&params),
            Filter::Equals {
                field: Field::DiseaseTargeted,
                value: "Cancer".to_string(),
            }
        );
    }

    #[test]
    fn all_parameters_are_anded_with_text_group_first() {
        let params = SearchParams {
            query: Some("kinase".to_string()),
            evidence_type: Some("in-vitro".to_string()),
            disease: Some("Alzheimer's".to_string()),
            confidence_score: Some("High".to_string()),
        };
        assert_eq!(
            build_filter(&params),
            Filter::And(vec![
                text_group("kinase"),
                Filter::Equals {
                    field: Field::EvidenceType,
                    value: "in-vitro".to_string(),
                },
                Filter::Equals {
                    field: Field::DiseaseTargeted,
                    value: "Alzheimer's".to_string(),
                },
                Filter::Equals {
                    field: Field::ConfidenceScore,
                    value: "High".to_string(),
                },
            ])
        );
    }

    #[test]
    fn query_is_kept_verbatim() {
        let filter = build_filter(&SearchParams::with_query("50% (w/v) a.b*"));
        assert_eq!(filter, text_group("50% (w/v) a.b*"));
    }

    #[test]
    fn display_renders_readable_expression() {
        let params = SearchParams {
            evidence_type: Some("in-vivo".to_string()),
            confidence_score: Some("Low".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_filter(&params).to_string(),
            r#"(compounds_info.evidence_type = "in-vivo" AND compounds_info.confidence_score = "Low")"#
        );
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let params = SearchParams::from_pairs(vec![
            ("query", "asp"),
            ("disease", "Cancer"),
            ("query", "zzz"),
            ("page", "2"),
            ("disease", "Stroke"),
            ("evidenceType", ""),
            ("evidenceType", "clinical"),
        ]);
        assert_eq!(
            params,
            SearchParams {
                query: Some("asp".to_string()),
                evidence_type: Some(String::new()),
                disease: Some("Cancer".to_string()),
                confidence_score: None,
            }
        );
        // An empty first value still counts as absent when building the filter
        assert_eq!(
            build_filter(&params),
            Filter::And(vec![
                text_group("asp"),
                Filter::Equals {
                    field: Field::DiseaseTargeted,
                    value: "Cancer".to_string(),
                },
            ])
        );
    }

    #[test]
    fn params_deserialize_from_camel_case() {
        let params: SearchParams = serde_json::from_value(serde_json::json!({
            "query": "aspirin",
            "evidenceType": "clinical",
            "confidenceScore": "Medium"
        }))
        .unwrap();
        assert_eq!(params.evidence_type.as_deref(), Some("clinical"));
        assert_eq!(params.confidence_score.as_deref(), Some("Medium"));
        assert!(params.disease.is_none());
    }
}
