/**
 * Collection Fetch
 * Typed fetch helpers over the document store. Collection reads feeding
 * best-effort aggregate views degrade to empty on upstream failure; the
 * strict variants propagate the error for call sites that reject a view
 * when any of its joined fetches fails.
 */
use crate::db::store::{self, Document, ListQuery, StoreError};

/// Fetch and map a whole collection, recovering upstream failure as an
/// empty collection (logged, never surfaced).
pub async fn collection<T>(name: &str, map: impl Fn(&Document) -> T) -> Vec<T> {
    filtered(name, &ListQuery::new(), map).await
}

/// Fetch and map with filters, degrading to empty on failure.
pub async fn filtered<T>(name: &str, query: &ListQuery, map: impl Fn(&Document) -> T) -> Vec<T> {
    match store::list(name, query).await {
        Ok(docs) => docs.iter().map(map).collect(),
        Err(e) => {
            tracing::error!(collection = name, error = %e, "collection read failed; degrading to empty");
            vec![]
        }
    }
}

/// Fetch and map a whole collection; failure propagates.
pub async fn collection_strict<T>(
    name: &str,
    map: impl Fn(&Document) -> T,
) -> Result<Vec<T>, StoreError> {
    let docs = store::list(name, &ListQuery::new()).await?;
    Ok(docs.iter().map(map).collect())
}

/// Fetch and map with filters; failure propagates.
pub async fn filtered_strict<T>(
    name: &str,
    query: &ListQuery,
    map: impl Fn(&Document) -> T,
) -> Result<Vec<T>, StoreError> {
    let docs = store::list(name, query).await?;
    Ok(docs.iter().map(map).collect())
}

/// Fetch and map a single document by id; absence is `Ok(None)`.
pub async fn by_id<T>(
    name: &str,
    id: &str,
    map: impl Fn(&Document) -> T,
) -> Result<Option<T>, StoreError> {
    let doc = store::get(name, id).await?;
    Ok(doc.as_ref().map(map))
}

/// Fetch and map the first document matching the query; absence is
/// `Ok(None)`.
pub async fn first<T>(
    name: &str,
    query: &ListQuery,
    map: impl Fn(&Document) -> T,
) -> Result<Option<T>, StoreError> {
    let docs = store::list(name, &query.clone().limit(1)).await?;
    Ok(docs.first().map(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::taxonomy::Category;

    // Without an initialized pool every strict read fails and every
    // degraded read recovers as empty.
    #[tokio::test]
    async fn test_degraded_fetch_recovers_as_empty() {
        let categories = collection("categories", Category::from_doc).await;
        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn test_strict_fetch_propagates_failure() {
        let result = collection_strict("categories", Category::from_doc).await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }
}
