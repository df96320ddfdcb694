//! Módulo de documentos

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_edit;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/documents", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/attachments", get(handler::list_attachments));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/attachments", post(handler::upload_attachment))
        .layer(middleware::from_fn(require_edit));

    read_routes.merge(manage_routes)
}
