//! DICA Server - gestão de mão de obra contratada
//!
//! # Visão geral
//!
//! API HTTP do sistema de gestão de contratos de mão de obra: cadastro
//! de funcionários e postos, grade diária de alocação, execuções de
//! atividade com anexos, férias/licenças, ocorrências, documentos,
//! relatório previsto × realizado e trilha de auditoria.
//!
//! # Estrutura de módulos
//!
//! ```text
//! dica-server/src/
//! ├── core/     # configuração, estado, servidor
//! ├── auth/     # JWT, papéis, middlewares de autorização
//! ├── api/      # rotas e handlers HTTP
//! ├── audit/    # trilha de auditoria (cadeia SHA256, diffs)
//! ├── db/       # SurrealDB embutido, modelos, repositórios
//! └── utils/    # erros, logging, datas
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-exports públicos
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export das funções de logger
pub use utils::logger::{init_logger, init_logger_with_file};

/// Log de eventos de segurança — formato estruturado via tracing
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Prepara o ambiente do processo (dotenv + logger)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("WORK_DIR")
        .map(|w| format!("{}/logs", w))
        .ok();
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.as_deref(),
    );

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____________
   / __ \/  _/ ____/   |
  / / / // // /   / /| |
 / /_/ // // /___/ ___ |
/_____/___/\____/_/  |_|
    "#
    );
}
