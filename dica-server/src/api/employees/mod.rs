//! Módulo de funcionários

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_edit;
use crate::core::ServerState;

/// Router de funcionários
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    // leitura: qualquer usuário autenticado
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/all", get(handler::list_with_inactive))
        .route("/{id}", get(handler::get_by_id));

    // escrita: exige can_edit (viewer e fiscal recebem 403)
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_edit));

    read_routes.merge(manage_routes)
}
