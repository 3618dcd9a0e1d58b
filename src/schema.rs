//! Entity schemas: field name/type pairs flattened for runtime use.

use serde_json::Value;

/// Wire type of a mutable column. Every column in this system is one of the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
}

/// One entity: table, URL path segment, and the ordered mutable field set.
/// The `id` primary key is implicit and never part of `fields`.
#[derive(Clone, Copy, Debug)]
pub struct EntitySchema {
    pub name: &'static str,
    pub table: &'static str,
    pub path_segment: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    /// Column list for SELECT/RETURNING: `id` followed by the mutable fields in order.
    pub fn column_list(&self) -> String {
        let mut cols = vec!["id".to_string()];
        cols.extend(self.fields.iter().map(|f| quoted(f.name)));
        cols.join(", ")
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Quote identifier for SQLite. Identifiers only ever come from the schema
/// constants below, never from request input.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

const fn text(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Text,
    }
}

const fn integer(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        ty: FieldType::Integer,
    }
}

pub const DENTIST: EntitySchema = EntitySchema {
    name: "dentist",
    table: "dentists",
    path_segment: "dentists",
    fields: &[text("last_name"), text("first_name"), text("license")],
};

pub const PATIENT: EntitySchema = EntitySchema {
    name: "patient",
    table: "patients",
    path_segment: "patients",
    fields: &[
        text("last_name"),
        text("first_name"),
        text("address"),
        text("dni"),
        text("registration_date"),
    ],
};

pub const APPOINTMENT: EntitySchema = EntitySchema {
    name: "appointment",
    table: "appointments",
    path_segment: "appointments",
    fields: &[
        text("date"),
        text("time"),
        text("description"),
        integer("patient_id"),
        integer("dentist_id"),
    ],
};

pub const ENTITIES: [&EntitySchema; 3] = [&DENTIST, &PATIENT, &APPOINTMENT];

pub fn entity_by_path(path: &str) -> Option<&'static EntitySchema> {
    ENTITIES.iter().copied().find(|e| e.path_segment == path)
}

/// A request-body value decoded against one field's expected type.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Missing from the payload, or JSON null.
    Absent,
    Text(String),
    /// Integers arrive as JSON numbers; a fractional value truncates.
    Integer(i64),
    /// Present but of an incompatible JSON type.
    Invalid,
}

impl FieldValue {
    /// The coerced value as a bindable JSON scalar, if it carries one.
    pub fn into_value(self) -> Option<Value> {
        match self {
            FieldValue::Text(s) => Some(Value::String(s)),
            FieldValue::Integer(n) => Some(Value::Number(n.into())),
            FieldValue::Absent | FieldValue::Invalid => None,
        }
    }

    /// Zero value for the field's type, used by full-replace decoding.
    pub fn zero(ty: FieldType) -> Value {
        match ty {
            FieldType::Text => Value::String(String::new()),
            FieldType::Integer => Value::Number(0.into()),
        }
    }
}

/// Classify one payload entry against the expected type.
pub fn classify(value: Option<&Value>, ty: FieldType) -> FieldValue {
    match (value, ty) {
        (None | Some(Value::Null), _) => FieldValue::Absent,
        (Some(Value::String(s)), FieldType::Text) => FieldValue::Text(s.clone()),
        (Some(Value::Number(n)), FieldType::Integer) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => match n.as_f64() {
                Some(f) => FieldValue::Integer(f as i64),
                None => FieldValue::Invalid,
            },
        },
        (Some(_), _) => FieldValue::Invalid,
    }
}
