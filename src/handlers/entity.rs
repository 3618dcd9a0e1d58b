//! Entity CRUD handlers: list, create, read, update, partial update, delete.
//! Handlers resolve the entity schema from the request's path segment, so one
//! handler set serves dentists, patients, and appointments alike.

use crate::error::AppError;
use crate::schema::{classify, entity_by_path, EntitySchema, FieldValue};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn resolve(path_segment: &str) -> Result<&'static EntitySchema, AppError> {
    entity_by_path(path_segment).ok_or_else(|| AppError::NotFound(path_segment.to_string()))
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<HashMap<String, Value>, AppError> {
    let Json(value) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Decode a full-replace record: every schema field in order, zero-filled when
/// absent or null, rejected when a supplied value has the wrong type.
fn full_record(
    entity: &EntitySchema,
    body: &HashMap<String, Value>,
) -> Result<Vec<(&'static str, Value)>, AppError> {
    entity
        .fields
        .iter()
        .map(|f| match classify(body.get(f.name), f.ty) {
            FieldValue::Invalid => Err(AppError::BadRequest(format!(
                "field '{}' has the wrong type",
                f.name
            ))),
            fv => Ok((f.name, fv.into_value().unwrap_or_else(|| FieldValue::zero(f.ty)))),
        })
        .collect()
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = resolve(&path_segment)?;
    let rows = CrudService::list(&state.pool, entity).await?;
    Ok((StatusCode::OK, Json(Value::Array(rows))))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = resolve(&path_segment)?;
    let body = body_to_map(body)?;
    // A supplied id is ignored: the store assigns one on insert.
    let record = full_record(entity, &body)?;
    let row = CrudService::create(&state.pool, entity, &record).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = resolve(&path_segment)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(&state.pool, entity, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", entity.name, id)))?;
    Ok((StatusCode::OK, Json(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = resolve(&path_segment)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    let record = full_record(entity, &body)?;
    CrudService::update(&state.pool, entity, id, &record).await?;
    // Write-through, no read-back: echo the replacement record under the path id.
    let mut echo = serde_json::Map::new();
    echo.insert("id".to_string(), Value::Number(id.into()));
    for (name, value) in record {
        echo.insert(name.to_string(), value);
    }
    Ok((StatusCode::OK, Json(Value::Object(echo))))
}

pub async fn partial_update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let entity = resolve(&path_segment)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    CrudService::partial_update(&state.pool, entity, id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let entity = resolve(&path_segment)?;
    let id = parse_id(&id_str)?;
    CrudService::delete(&state.pool, entity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
