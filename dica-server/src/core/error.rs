use thiserror::Error;

/// Erros da camada de bootstrap do servidor
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("erro de configuração: {0}")]
    Config(String),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

/// Result da inicialização do servidor
pub type Result<T> = std::result::Result<T, ServerError>;
