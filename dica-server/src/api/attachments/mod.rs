//! Módulo de anexos
//!
//! Upload acontece nos sub-recursos dos donos (execuções, documentos);
//! aqui ficam download e remoção por ID, além do armazenamento em disco
//! compartilhado ([`store`]).

mod handler;
pub mod store;

use axum::{Router, middleware, routing::get};

use crate::auth::require_edit;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attachments", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/{id}/download", get(handler::download));

    let manage_routes = Router::new()
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_edit));

    read_routes.merge(manage_routes)
}
