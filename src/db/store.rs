/**
 * Document Store
 * Generic persistence operations over the per-collection JSONB documents
 * table: list (equality filters, ordering, limit), get, create, update
 * (partial merge), delete.
 */
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::db;

/// A raw remote document: opaque JSONB payload plus the platform metadata
/// (identifier, server-assigned timestamps) kept outside the payload.
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database pool not initialized")]
    Unavailable,
    #[error("document not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Filter/sort/limit predicates for `list` and `count`. Equality filters
/// compare a top-level data field against a JSON value; ordering is on a
/// top-level data field (as text) with creation time as the tie-break.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    equals: Vec<(String, Value)>,
    order_by: Option<(String, Order)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.equals.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, order: Order) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn push_filters<'a>(&'a self, qb: &mut QueryBuilder<'a, Postgres>) {
        for (field, value) in &self.equals {
            qb.push(" AND data -> ");
            qb.push_bind(field);
            qb.push(" = ");
            qb.push_bind(value);
        }
    }
}

fn pool() -> Result<std::sync::Arc<sqlx::PgPool>, StoreError> {
    db::get_pool().ok_or(StoreError::Unavailable)
}

/// List documents in a collection. Without an explicit ordering, newest
/// documents come first.
pub async fn list(collection: &str, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
    let pool = pool()?;

    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT id, data, created_at, updated_at FROM documents WHERE collection = ",
    );
    qb.push_bind(collection);
    query.push_filters(&mut qb);

    match &query.order_by {
        Some((field, order)) => {
            qb.push(" ORDER BY data ->> ");
            qb.push_bind(field);
            qb.push(match order {
                Order::Asc => " ASC",
                Order::Desc => " DESC",
            });
            qb.push(", created_at ASC");
        }
        None => {
            qb.push(" ORDER BY created_at DESC");
        }
    }

    if let Some(limit) = query.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }
    if let Some(offset) = query.offset {
        qb.push(" OFFSET ");
        qb.push_bind(offset);
    }

    let docs = qb
        .build_query_as::<Document>()
        .fetch_all(pool.as_ref())
        .await?;
    Ok(docs)
}

/// Count documents matching the query's equality filters.
pub async fn count(collection: &str, query: &ListQuery) -> Result<i64, StoreError> {
    let pool = pool()?;

    let mut qb =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE collection = ");
    qb.push_bind(collection);
    query.push_filters(&mut qb);

    let count: (i64,) = qb.build_query_as().fetch_one(pool.as_ref()).await?;
    Ok(count.0)
}

/// Fetch a single document. Absence is a `None`, not an error; callers
/// decide whether that means 404, a placeholder, or silent exclusion.
pub async fn get(collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
    let pool = pool()?;

    let doc = sqlx::query_as::<_, Document>(
        r#"
        SELECT id, data, created_at, updated_at
        FROM documents
        WHERE collection = $1 AND id = $2
        "#,
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?;

    Ok(doc)
}

/// Create a document. The identifier is caller-supplied or generated.
pub async fn create(
    collection: &str,
    id: Option<String>,
    data: Value,
) -> Result<Document, StoreError> {
    let pool = pool()?;
    let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let doc = sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (collection, id, data, created_at, updated_at)
        VALUES ($1, $2, $3, now(), now())
        RETURNING id, data, created_at, updated_at
        "#,
    )
    .bind(collection)
    .bind(&id)
    .bind(&data)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(doc)
}

/// Partial-merge update: fields present in `patch` replace the stored
/// fields, everything else is left untouched.
pub async fn update(collection: &str, id: &str, patch: Value) -> Result<Document, StoreError> {
    let pool = pool()?;

    let doc = sqlx::query_as::<_, Document>(
        r#"
        UPDATE documents
        SET data = data || $3, updated_at = now()
        WHERE collection = $1 AND id = $2
        RETURNING id, data, created_at, updated_at
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(&patch)
    .fetch_optional(pool.as_ref())
    .await?;

    doc.ok_or(StoreError::NotFound)
}

pub async fn delete(collection: &str, id: &str) -> Result<(), StoreError> {
    let pool = pool()?;

    let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
        .bind(collection)
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_query_defaults_are_empty() {
        let query = ListQuery::new();
        assert!(query.equals.is_empty());
        assert!(query.order_by.is_none());
        assert!(query.limit.is_none());
        assert!(query.offset.is_none());
    }

    #[test]
    fn test_list_query_builder_chains() {
        let query = ListQuery::new()
            .equals("status", "published")
            .equals("featured", true)
            .order_by("date", Order::Desc)
            .limit(10)
            .offset(20);

        assert_eq!(query.equals.len(), 2);
        assert_eq!(query.equals[0], ("status".to_string(), json!("published")));
        assert_eq!(query.equals[1], ("featured".to_string(), json!(true)));
        assert_eq!(query.order_by, Some(("date".to_string(), Order::Desc)));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(20));
    }

    #[tokio::test]
    async fn test_store_unavailable_without_pool() {
        let result = get("categories", "missing").await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }

    // Writes must reject, never report success, when the collaborator is
    // unreachable.
    #[tokio::test]
    async fn test_write_failure_propagates() {
        let created = create("categories", None, json!({ "name": "x" })).await;
        assert!(created.is_err());

        let updated = update("categories", "c1", json!({ "name": "y" })).await;
        assert!(updated.is_err());

        let deleted = delete("categories", "c1").await;
        assert!(deleted.is_err());
    }
}
