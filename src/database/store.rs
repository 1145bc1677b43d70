use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::postgres::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::DbPool;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store operation timed out")]
    Timeout,

    #[error("document must serialize to a JSON object")]
    NotAnObject,

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A typed view over one named collection of JSONB documents.
///
/// Filters are partial documents matched with the `@>` containment
/// operator, so nested fields match naturally
/// (e.g. `{"payment": {"sequenceId": "..."}}`). Updates are shallow
/// top-level merges via `||`.
pub struct Collection<T> {
    pool: PgPool,
    name: &'static str,
    op_timeout: Duration,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(pool: &DbPool, name: &'static str, op_timeout: Duration) -> Self {
        Self {
            pool: pool.inner().clone(),
            name,
            op_timeout,
            _marker: PhantomData,
        }
    }

    /// Every store call runs under the configured per-operation deadline.
    async fn deadline<F, O>(&self, fut: F) -> Result<O, StoreError>
    where
        F: Future<Output = Result<O, StoreError>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    /// Inserts a document and returns its generated identifier. The id is
    /// also embedded in the stored document so filters can reference it.
    pub async fn create(&self, document: &T) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let data = embed_id(serde_json::to_value(document)?, id)?;

        self.deadline(async {
            sqlx::query("INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(self.name)
                .bind(&data)
                .execute(&self.pool)
                .await?;
            Ok(id)
        })
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.deadline(async {
            let data = sqlx::query_scalar::<_, Value>(
                "SELECT data FROM documents WHERE collection = $1 AND id = $2",
            )
            .bind(self.name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            data.map(serde_json::from_value).transpose().map_err(Into::into)
        })
        .await
    }

    pub async fn find_one(&self, filter: &Value) -> Result<Option<T>, StoreError> {
        self.deadline(async {
            let data = sqlx::query_scalar::<_, Value>(
                "SELECT data FROM documents WHERE collection = $1 AND data @> $2 LIMIT 1",
            )
            .bind(self.name)
            .bind(filter)
            .fetch_optional(&self.pool)
            .await?;

            data.map(serde_json::from_value).transpose().map_err(Into::into)
        })
        .await
    }

    pub async fn find_many(&self, filter: &Value) -> Result<Vec<T>, StoreError> {
        self.deadline(async {
            let rows = sqlx::query_scalar::<_, Value>(
                "SELECT data FROM documents \
                 WHERE collection = $1 AND data @> $2 \
                 ORDER BY created_at DESC",
            )
            .bind(self.name)
            .bind(filter)
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(|data| serde_json::from_value(data).map_err(Into::into))
                .collect()
        })
        .await
    }

    /// Shallow-merges `patch` into the stored document. Returns whether a
    /// document was matched.
    pub async fn update_by_id(&self, id: Uuid, patch: &Value) -> Result<bool, StoreError> {
        self.deadline(async {
            let result = sqlx::query(
                "UPDATE documents SET data = data || $3, updated_at = now() \
                 WHERE collection = $1 AND id = $2",
            )
            .bind(self.name)
            .bind(id)
            .bind(patch)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        self.deadline(async {
            let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                .bind(self.name)
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    /// Deletes everything matching the filter and returns the affected count.
    pub async fn delete_many(&self, filter: &Value) -> Result<u64, StoreError> {
        self.deadline(async {
            let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND data @> $2")
                .bind(self.name)
                .bind(filter)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        })
        .await
    }

    pub async fn count(&self, filter: &Value) -> Result<i64, StoreError> {
        self.deadline(async {
            let count = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM documents WHERE collection = $1 AND data @> $2",
            )
            .bind(self.name)
            .bind(filter)
            .fetch_one(&self.pool)
            .await?;
            Ok(count)
        })
        .await
    }

    /// Creates an expression index over a document field, scoped to this
    /// collection. `field` uses dot notation for nested paths and always
    /// comes from code, never from request input.
    pub async fn create_index(&self, field: &str, unique: bool) -> Result<(), StoreError> {
        let sql = index_statement(self.name, field, unique);
        self.deadline(async {
            sqlx::query(&sql).execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}

fn embed_id(mut value: Value, id: Uuid) -> Result<Value, StoreError> {
    match value.as_object_mut() {
        Some(object) => {
            object.insert("id".to_string(), Value::String(id.to_string()));
            Ok(value)
        }
        None => Err(StoreError::NotAnObject),
    }
}

fn index_statement(collection: &str, field: &str, unique: bool) -> String {
    let ident = field.replace('.', "_").to_lowercase();
    let path = field.replace('.', ",");
    format!(
        "CREATE {}INDEX IF NOT EXISTS {}_{}_idx ON documents ((data #>> '{{{}}}')) WHERE collection = '{}'",
        if unique { "UNIQUE " } else { "" },
        collection,
        ident,
        path,
        collection,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embed_id_adds_identifier_to_object() {
        let id = Uuid::new_v4();
        let value = embed_id(json!({"email": "a@b.c"}), id).unwrap();
        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["email"], json!("a@b.c"));
    }

    #[test]
    fn embed_id_rejects_non_objects() {
        let err = embed_id(json!([1, 2, 3]), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
    }

    #[test]
    fn index_statement_handles_nested_paths() {
        let sql = index_statement("disbursements", "payment.sequenceId", false);
        assert!(sql.contains("disbursements_payment_sequenceid_idx"));
        assert!(sql.contains("(data #>> '{payment,sequenceId}')"));
        assert!(sql.ends_with("WHERE collection = 'disbursements'"));
        assert!(!sql.contains("UNIQUE"));
    }

    #[test]
    fn index_statement_supports_unique_indexes() {
        let sql = index_statement("users", "email", true);
        assert!(sql.starts_with("CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx"));
        assert!(sql.ends_with("WHERE collection = 'users'"));
    }
}
