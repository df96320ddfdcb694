//! Módulo central - configuração, estado e servidor
//!
//! # Estrutura
//!
//! - [`Config`] - configuração do servidor
//! - [`ServerState`] - estado compartilhado
//! - [`Server`] - servidor HTTP
//! - [`ServerError`] - erros de bootstrap

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{Server, build_app, build_router};
pub use state::ServerState;
