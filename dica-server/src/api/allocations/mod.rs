//! Módulo da grade de alocação

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{require_edit, require_export};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/allocations", routes())
}

fn routes() -> Router<ServerState> {
    // leitura: qualquer usuário autenticado
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/grid", get(handler::grid))
        .route("/template.csv", get(handler::template));

    // exportação: exige can_export
    let export_routes = Router::new()
        .route("/export.csv", get(handler::export_csv))
        .layer(middleware::from_fn(require_export));

    // escrita: exige can_edit
    let manage_routes = Router::new()
        .route("/batch", post(handler::batch_save))
        .route("/copy-month", post(handler::copy_month))
        .route("/import-csv", post(handler::import_csv))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_edit));

    read_routes.merge(export_routes).merge(manage_routes)
}
