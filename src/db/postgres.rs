//! PostgreSQL compound store
//!
//! Records live in the `compounds` table with the evidence entries kept as a
//! JSONB array (see `migrations/0001_create_compounds.sql`). A [`Filter`] is
//! rendered into a parameterized WHERE clause; evidence-field conditions become
//! `EXISTS` over `jsonb_array_elements`, so each condition may be satisfied by a
//! different entry of the same record.

use super::CompoundStore;
use crate::{
    config::SearchConfig,
    errors::SearchResult,
    search::{
        filter::{Field, Filter, FindOptions},
        schema::RawCompound,
    },
};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, info};

/// Pool settings for the Postgres store
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_search_config(url: String, config: &SearchConfig) -> Self {
        Self {
            url,
            max_connections: config.max_connections,
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
        }
    }
}

#[derive(Clone)]
pub struct PgCompoundStore {
    pool: PgPool,
}

impl PgCompoundStore {
    /// Build the pool without connecting; an unreachable database shows up as
    /// a failed search rather than a failed startup.
    pub fn connect_lazy(config: &DatabaseConfig) -> SearchResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)?;

        info!(
            max_connections = config.max_connections,
            "Postgres compound store initialized (lazy connect)"
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompoundStore for PgCompoundStore {
    fn id(&self) -> &'static str {
        "postgres"
    }

    async fn find(&self, filter: &Filter, options: &FindOptions) -> SearchResult<Vec<RawCompound>> {
        let mut query = build_find_query(filter, options);
        debug!(sql = query.sql(), "Executing compound search");

        let rows = query
            .build_query_as::<RawCompound>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

/// Full SELECT for a filter, ordered by byte order of the name with NULL names first.
pub fn build_find_query(filter: &Filter, options: &FindOptions) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT c.compound_name, c.compounds_info FROM compounds AS c WHERE ",
    );
    push_filter(&mut query, filter);
    query.push(r#" ORDER BY c.compound_name COLLATE "C" ASC NULLS FIRST LIMIT "#);
    query.push_bind(options.limit as i64);
    query
}

fn push_filter(query: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    match filter {
        Filter::And(terms) if terms.is_empty() => {
            query.push("TRUE");
        }
        Filter::Or(terms) if terms.is_empty() => {
            query.push("FALSE");
        }
        Filter::And(terms) => push_joined(query, terms, " AND "),
        Filter::Or(terms) => push_joined(query, terms, " OR "),
        Filter::TextMatch { field, needle } => {
            push_condition(query, *field, " ILIKE ", format!("%{}%", escape_like(needle)), true);
        }
        Filter::Equals { field, value } => {
            push_condition(query, *field, " = ", value.clone(), false);
        }
    }
}

fn push_joined(query: &mut QueryBuilder<'static, Postgres>, terms: &[Filter], separator: &str) {
    query.push("(");
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            query.push(separator);
        }
        push_filter(query, term);
    }
    query.push(")");
}

fn push_condition(
    query: &mut QueryBuilder<'static, Postgres>,
    field: Field,
    operator: &str,
    bound: String,
    like: bool,
) {
    if field.is_evidence_field() {
        // Non-array compounds_info behaves like an empty evidence list
        query.push(
            "EXISTS (SELECT 1 FROM jsonb_array_elements(CASE WHEN jsonb_typeof(c.compounds_info) = 'array' \
             THEN c.compounds_info ELSE '[]'::jsonb END) AS e WHERE e ->> '",
        );
        query.push(field.key());
        query.push("'");
    } else {
        query.push("c.compound_name");
    }

    query.push(operator);
    query.push_bind(bound);

    if like {
        query.push(r" ESCAPE '\'");
    }
    if field.is_evidence_field() {
        query.push(")");
    }
}

/// Escape LIKE metacharacters so the needle matches literally
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
