//! Generic CRUD execution against SQLite.

use crate::error::AppError;
use crate::schema::{EntitySchema, FieldType};
use crate::sql::{self, BindValue};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// All rows of the entity's table, storage order.
    pub async fn list(pool: &SqlitePool, entity: &EntitySchema) -> Result<Vec<Value>, AppError> {
        let q = sql::select_all(entity);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql).fetch_all(pool).await?;
        rows.iter().map(|r| row_to_json(entity, r)).collect()
    }

    /// Fetch one row by id. Returns None when no row matches.
    pub async fn read(
        pool: &SqlitePool,
        entity: &EntitySchema,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let q = sql::select_by_id(entity, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        let row = query.fetch_optional(pool).await?;
        row.map(|r| row_to_json(entity, &r)).transpose()
    }

    /// Insert a full record; the store assigns the id. Returns the created row.
    pub async fn create(
        pool: &SqlitePool,
        entity: &EntitySchema,
        record: &[(&'static str, Value)],
    ) -> Result<Value, AppError> {
        let q = sql::insert(entity, record);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        let row = query.fetch_one(pool).await?;
        row_to_json(entity, &row)
    }

    /// Overwrite every mutable column of the row with `id`. No existence check:
    /// updating an absent id is a no-op.
    pub async fn update(
        pool: &SqlitePool,
        entity: &EntitySchema,
        id: i64,
        record: &[(&'static str, Value)],
    ) -> Result<(), AppError> {
        let q = sql::update_full(entity, id, record);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        query.execute(pool).await?;
        Ok(())
    }

    /// Apply the recognized, type-valid subset of `body` to the row with `id`.
    /// When nothing matches, storage is not touched at all.
    pub async fn partial_update(
        pool: &SqlitePool,
        entity: &EntitySchema,
        id: i64,
        body: &HashMap<String, Value>,
    ) -> Result<(), AppError> {
        let Some(q) = sql::partial_update(entity, id, body) else {
            tracing::debug!(entity = entity.name, id, "no matching fields, skipping update");
            return Ok(());
        };
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        query.execute(pool).await?;
        Ok(())
    }

    /// Delete by id. Succeeds whether or not a row was removed.
    pub async fn delete(pool: &SqlitePool, entity: &EntitySchema, id: i64) -> Result<(), AppError> {
        let q = sql::delete(entity, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(BindValue::from_json(p));
        }
        query.execute(pool).await?;
        Ok(())
    }
}

/// Decode a row into a JSON object using the schema's declared field types,
/// rather than probing the cell's runtime type.
fn row_to_json(entity: &EntitySchema, row: &SqliteRow) -> Result<Value, AppError> {
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    let id: i64 = row.try_get("id")?;
    map.insert("id".to_string(), Value::Number(id.into()));
    for f in entity.fields {
        let v = match f.ty {
            FieldType::Text => row
                .try_get::<Option<String>, _>(f.name)?
                .map(Value::String)
                .unwrap_or(Value::Null),
            FieldType::Integer => row
                .try_get::<Option<i64>, _>(f.name)?
                .map(|n| Value::Number(n.into()))
                .unwrap_or(Value::Null),
        };
        map.insert(f.name.to_string(), v);
    }
    Ok(Value::Object(map))
}
