//! Módulo de utilitários - funções e tipos comuns
//!
//! # Conteúdo
//!
//! - [`AppError`] / [`AppResult`] - erros da aplicação
//! - [`logger`] - setup de tracing
//! - [`time`] - datas e competências

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult};
