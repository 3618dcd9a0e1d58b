//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from an entity schema.

use crate::schema::{classify, quoted, EntitySchema};
use serde_json::Value;
use std::collections::HashMap;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) {
        self.params.push(v);
    }
}

/// SELECT every row. No ORDER BY: list responses follow storage order.
pub fn select_all(entity: &EntitySchema) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", entity.column_list(), quoted(entity.table));
    q
}

/// SELECT one row by primary key.
pub fn select_by_id(entity: &EntitySchema, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE id = ?",
        entity.column_list(),
        quoted(entity.table)
    );
    q.push_param(Value::Number(id.into()));
    q
}

/// INSERT a full record. The store assigns the id; RETURNING echoes the stored row.
pub fn insert(entity: &EntitySchema, record: &[(&'static str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in record {
        cols.push(quoted(name));
        placeholders.push("?");
        q.push_param(value.clone());
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        entity.column_list()
    );
    q
}

/// UPDATE every mutable column (full replace), id bound last.
pub fn update_full(entity: &EntitySchema, id: i64, record: &[(&'static str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, value) in record {
        sets.push(format!("{} = ?", quoted(name)));
        q.push_param(value.clone());
    }
    q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = ?",
        quoted(entity.table),
        sets.join(", ")
    );
    q
}

/// UPDATE only the recognized, type-valid fields of `body`.
///
/// Fields are taken in schema order, not payload order, so the statement text
/// is identical for identical payload content. Keys outside the schema never
/// reach the SQL text. Returns None when no field matches; callers must not
/// touch storage in that case.
pub fn partial_update(
    entity: &EntitySchema,
    id: i64,
    body: &HashMap<String, Value>,
) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in entity.fields {
        if let Some(v) = classify(body.get(f.name), f.ty).into_value() {
            sets.push(format!("{} = ?", quoted(f.name)));
            q.push_param(v);
        }
    }
    if sets.is_empty() {
        return None;
    }
    q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = ?",
        quoted(entity.table),
        sets.join(", ")
    );
    Some(q)
}

/// DELETE by id. Row-count feedback is deliberately unused by callers.
pub fn delete(entity: &EntitySchema, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {} WHERE id = ?", quoted(entity.table));
    q.push_param(Value::Number(id.into()));
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{APPOINTMENT, DENTIST};
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn partial_update_sets_only_supplied_fields() {
        let body = map(&[("license", json!("D999"))]);
        let q = partial_update(&DENTIST, 1, &body).unwrap();
        assert_eq!(q.sql, "UPDATE \"dentists\" SET \"license\" = ? WHERE id = ?");
        assert_eq!(q.params, vec![json!("D999"), json!(1)]);
    }

    #[test]
    fn partial_update_follows_schema_order_not_payload_order() {
        let body = map(&[
            ("license", json!("D1")),
            ("first_name", json!("Jane")),
            ("last_name", json!("Smith")),
        ]);
        let q = partial_update(&DENTIST, 5, &body).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"dentists\" SET \"last_name\" = ?, \"first_name\" = ?, \"license\" = ? WHERE id = ?"
        );
        assert_eq!(q.params, vec![json!("Smith"), json!("Jane"), json!("D1"), json!(5)]);
    }

    #[test]
    fn partial_update_skips_wrong_typed_fields() {
        let body = map(&[("dentist_id", json!("abc")), ("description", json!("cleaning"))]);
        let q = partial_update(&APPOINTMENT, 3, &body).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"appointments\" SET \"description\" = ? WHERE id = ?"
        );
    }

    #[test]
    fn partial_update_truncates_float_for_integer_field() {
        let body = map(&[("patient_id", json!(2.7))]);
        let q = partial_update(&APPOINTMENT, 1, &body).unwrap();
        assert_eq!(q.params, vec![json!(2), json!(1)]);
    }

    #[test]
    fn partial_update_ignores_unrecognized_keys() {
        let body = map(&[
            ("license = 'x' --", json!("payload")),
            ("color", json!("blue")),
            ("license", json!("D2")),
        ]);
        let q = partial_update(&DENTIST, 1, &body).unwrap();
        assert_eq!(q.sql, "UPDATE \"dentists\" SET \"license\" = ? WHERE id = ?");
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn partial_update_with_no_matching_fields_builds_nothing() {
        assert!(partial_update(&DENTIST, 1, &map(&[])).is_none());
        assert!(partial_update(&DENTIST, 1, &map(&[("color", json!("blue"))])).is_none());
        assert!(partial_update(&DENTIST, 1, &map(&[("license", json!(42))])).is_none());
    }

    #[test]
    fn insert_returns_stored_row() {
        let record = vec![
            ("last_name", json!("Smith")),
            ("first_name", json!("Jane")),
            ("license", json!("D123")),
        ];
        let q = insert(&DENTIST, &record);
        assert_eq!(
            q.sql,
            "INSERT INTO \"dentists\" (\"last_name\", \"first_name\", \"license\") VALUES (?, ?, ?) \
             RETURNING id, \"last_name\", \"first_name\", \"license\""
        );
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn update_full_sets_every_column() {
        let record = vec![
            ("last_name", json!("Doe")),
            ("first_name", json!("")),
            ("license", json!("")),
        ];
        let q = update_full(&DENTIST, 9, &record);
        assert_eq!(
            q.sql,
            "UPDATE \"dentists\" SET \"last_name\" = ?, \"first_name\" = ?, \"license\" = ? WHERE id = ?"
        );
        assert_eq!(q.params.last(), Some(&json!(9)));
    }

    #[test]
    fn delete_by_id() {
        let q = delete(&DENTIST, 4);
        assert_eq!(q.sql, "DELETE FROM \"dentists\" WHERE id = ?");
        assert_eq!(q.params, vec![json!(4)]);
    }
}
