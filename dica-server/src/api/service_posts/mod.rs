//! Módulo de postos de serviço

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_edit;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/service-posts", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/activities", get(handler::list_activities));

    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route(
            "/{id}/activities",
            axum::routing::post(handler::create_activity),
        )
        .layer(middleware::from_fn(require_edit));

    read_routes.merge(manage_routes)
}
