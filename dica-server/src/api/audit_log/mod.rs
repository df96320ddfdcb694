//! Módulo da trilha de auditoria (consulta, exportação, verificação)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/audit-logs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/entity-types", get(handler::entity_types))
        .route("/actions", get(handler::actions))
        .route("/export", get(handler::export))
        .route("/verify", get(handler::verify_chain))
        .route_layer(middleware::from_fn(require_admin))
}
