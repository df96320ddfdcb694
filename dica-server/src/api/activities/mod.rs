//! Módulo de atividades recorrentes

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_edit;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/activities", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_edit));

    read_routes.merge(manage_routes)
}
