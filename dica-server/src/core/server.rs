//! Servidor HTTP
//!
//! Montagem do router axum e ciclo de vida do servidor.

use std::net::SocketAddr;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerState};

/// Middleware de log de acesso HTTP
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Monta o router axum (sem estado)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Núcleo
        .merge(crate::api::auth::router())
        .merge(crate::api::health::router())
        .merge(crate::api::users::router())
        // Cadastros
        .merge(crate::api::employees::router())
        .merge(crate::api::service_posts::router())
        .merge(crate::api::activities::router())
        // Operação diária
        .merge(crate::api::allocations::router())
        .merge(crate::api::executions::router())
        .merge(crate::api::attachments::router())
        .merge(crate::api::ferias_licencas::router())
        .merge(crate::api::occurrences::router())
        .merge(crate::api::documents::router())
        // Relatórios e auditoria
        .merge(crate::api::reports::router())
        .merge(crate::api::audit_log::router())
}

/// Monta a aplicação completa, com estado e middlewares
///
/// Usado pelo servidor e pelos testes de integração (oneshot).
pub fn build_router(state: ServerState) -> Router {
    build_app()
        // autenticação JWT no nível do router; require_auth pula as rotas públicas
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}

/// Servidor HTTP
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Cria o servidor com estado já inicializado
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // tarefas de background (worker de auditoria, detecção de LOCK)
        state.start_background_tasks().await;

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("DICA server listening on http://{}", addr);

        let handle = axum_server::Handle::new();

        // encerramento gracioso no ctrl-c
        let shutdown_handle = handle.clone();
        let shutdown_state = state.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_state.audit_service.on_shutdown().await;
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| crate::core::ServerError::Internal(e.into()))?;

        Ok(())
    }
}
