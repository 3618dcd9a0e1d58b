//! Entity CRUD routes. Parameterized paths hand the resource segment to the
//! handlers, which resolve the entity schema themselves; the auth gate wraps
//! the whole table and lets read methods through.

use crate::auth::require_api_key;
use crate::handlers::entity::{create, delete as delete_handler, list, partial_update, read, update};
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:resource", get(list).post(create))
        .route(
            "/:resource/:id",
            get(read)
                .put(update)
                .patch(partial_update)
                .delete(delete_handler),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}
