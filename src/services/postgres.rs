use crate::core::catalog::{AGE_FIELD, BREED_FIELD, SEX_FIELD};
use crate::models::{
    AgeSummary, BreedCount, Condition, Document, SexCount, SortDirection, SortSpec,
    StructuredPredicate,
};
use crate::services::store::{clamp_limit, AnimalStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;

/// PostgreSQL-backed animal store
///
/// Each shelter record is one JSONB document in the `animals` table, so
/// arbitrary passthrough fields survive without schema changes. The `id`
/// column is the insertion order and never leaves the store.
pub struct PostgresStore {
    pool: PgPool,
}

/// Append `WHERE ...` for a predicate; nothing for the match-all predicate
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &StructuredPredicate) {
    if predicate.is_match_all() {
        return;
    }

    builder.push(" WHERE ");
    let mut clauses = builder.separated(" AND ");

    for condition in &predicate.conditions {
        match condition {
            Condition::In { field, values } => {
                clauses.push("document ->> ");
                clauses.push_bind_unseparated(field.clone());
                clauses.push_unseparated(" = ANY(");
                clauses.push_bind_unseparated(values.clone());
                clauses.push_unseparated(")");
            }
            Condition::Equals { field, value } => {
                clauses.push("document ->> ");
                clauses.push_bind_unseparated(field.clone());
                clauses.push_unseparated(" = ");
                clauses.push_bind_unseparated(value.clone());
            }
            Condition::Between { field, min, max } => {
                // Text ages must not reach the cast
                clauses.push("(CASE WHEN jsonb_typeof(document -> ");
                clauses.push_bind_unseparated(field.clone());
                clauses.push_unseparated(") = 'number' THEN (document ->> ");
                clauses.push_bind_unseparated(field.clone());
                clauses.push_unseparated(")::float8 END) BETWEEN ");
                clauses.push_bind_unseparated(*min);
                clauses.push_unseparated(" AND ");
                clauses.push_bind_unseparated(*max);
            }
        }
    }
}

fn into_document(value: Value) -> Document {
    match value {
        Value::Object(document) => document,
        other => {
            tracing::warn!("Skipping non-object document body: {}", other);
            Document::new()
        }
    }
}

impl PostgresStore {
    /// Connect, then run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from optional settings, falling back to defaults
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Bulk-load documents, e.g. from a shelter export
    pub async fn insert_documents(&self, documents: &[Document]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        for document in documents {
            sqlx::query("INSERT INTO animals (document) VALUES ($1)")
                .bind(Json(document))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Inserted {} animal documents", documents.len());

        Ok(documents.len() as u64)
    }

    async fn group_counts(
        &self,
        predicate: &StructuredPredicate,
        field: &str,
    ) -> Result<Vec<(Option<String>, u64)>, StoreError> {
        let mut builder = QueryBuilder::new("SELECT document ->> ");
        builder.push_bind(field.to_string());
        builder.push(" AS group_key, COUNT(*) AS group_count FROM animals");
        push_predicate(&mut builder, predicate);
        builder.push(" GROUP BY 1 ORDER BY group_count DESC, group_key ASC NULLS LAST");

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<(Option<String>, u64), StoreError> {
                let key: Option<String> = row.try_get("group_key")?;
                let count: i64 = row.try_get("group_count")?;
                Ok((key, count.max(0) as u64))
            })
            .collect()
    }
}

#[async_trait]
impl AnimalStore for PostgresStore {
    async fn ping(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("PostgreSQL ping failed: {}", e);
                false
            }
        }
    }

    async fn fetch_page(
        &self,
        predicate: &StructuredPredicate,
        sort: &[SortSpec],
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError> {
        let mut builder = QueryBuilder::new("SELECT document FROM animals");
        push_predicate(&mut builder, predicate);

        builder.push(" ORDER BY ");
        for spec in sort {
            builder.push("document -> ");
            builder.push_bind(spec.field.clone());
            builder.push(match spec.direction {
                SortDirection::Asc => " ASC, ",
                SortDirection::Desc => " DESC, ",
            });
        }
        builder.push("id ASC OFFSET ");
        builder.push_bind(i64::try_from(skip).unwrap_or(i64::MAX));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(clamp_limit(limit)));

        let rows = builder.build().fetch_all(&self.pool).await?;

        let documents = rows
            .iter()
            .map(|row| row.try_get::<Value, _>("document").map(into_document))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Fetched {} documents (skip {})", documents.len(), skip);

        Ok(documents)
    }

    async fn count(&self, predicate: &StructuredPredicate) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS total FROM animals");
        push_predicate(&mut builder, predicate);

        let row = builder.build().fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("total")?;

        Ok(total.max(0) as u64)
    }

    async fn breed_counts(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Vec<BreedCount>, StoreError> {
        Ok(self
            .group_counts(predicate, BREED_FIELD)
            .await?
            .into_iter()
            .map(|(breed, count)| BreedCount { breed, count })
            .collect())
    }

    async fn sex_counts(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Vec<SexCount>, StoreError> {
        Ok(self
            .group_counts(predicate, SEX_FIELD)
            .await?
            .into_iter()
            .map(|(sex_upon_outcome, count)| SexCount {
                sex_upon_outcome,
                count,
            })
            .collect())
    }

    async fn age_summary(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Option<AgeSummary>, StoreError> {
        let mut builder = QueryBuilder::new(
            "SELECT MIN(age) AS min_weeks, MAX(age) AS max_weeks, AVG(age) AS avg_weeks \
             FROM (SELECT CASE WHEN jsonb_typeof(document -> ",
        );
        builder.push_bind(AGE_FIELD);
        builder.push(") = 'number' THEN (document ->> ");
        builder.push_bind(AGE_FIELD);
        builder.push(")::float8 END AS age FROM animals");
        push_predicate(&mut builder, predicate);
        builder.push(") AS ages");

        let row = builder.build().fetch_one(&self.pool).await?;

        let min_weeks: Option<f64> = row.try_get("min_weeks")?;
        let max_weeks: Option<f64> = row.try_get("max_weeks")?;
        let avg_weeks: Option<f64> = row.try_get("avg_weeks")?;

        Ok(match (min_weeks, max_weeks, avg_weeks) {
            (Some(min_weeks), Some(max_weeks), Some(avg_weeks)) => Some(AgeSummary {
                min_weeks,
                max_weeks,
                avg_weeks,
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::predicate_for;
    use crate::models::Category;

    #[test]
    fn test_match_all_has_no_where_clause() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT document FROM animals");
        push_predicate(&mut builder, &predicate_for(Category::All));

        assert_eq!(builder.sql(), "SELECT document FROM animals");
    }

    #[test]
    fn test_water_predicate_sql() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT document FROM animals");
        push_predicate(&mut builder, &predicate_for(Category::Water));

        assert_eq!(
            builder.sql(),
            "SELECT document FROM animals WHERE document ->> $1 = ANY($2) \
             AND document ->> $3 = $4 \
             AND (CASE WHEN jsonb_typeof(document -> $5) = 'number' THEN (document ->> $6)::float8 END) \
             BETWEEN $7 AND $8"
        );
    }

    #[test]
    fn test_into_document_non_object() {
        assert!(into_document(Value::Null).is_empty());
    }
}
