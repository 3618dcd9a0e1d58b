//! Odontology API: dental-clinic records backend (dentists, patients, appointments).

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::{require_api_key, API_KEY_HEADER};
pub use error::AppError;
pub use routes::{common_routes_with_ready, entity_routes};
pub use schema::{entity_by_path, EntitySchema, FieldType, FieldValue};
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect, ensure_tables};
