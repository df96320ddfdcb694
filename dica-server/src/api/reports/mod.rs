//! Módulo de relatórios

mod handler;

pub use handler::compliance_pct;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/reports/previsto-realizado",
        get(handler::previsto_realizado),
    )
}
