//! Rotas da API
//!
//! # Estrutura
//!
//! - [`health`] - checagem de saúde
//! - [`auth`] - login e sessão
//! - [`users`] - contas de acesso (admin)
//! - [`employees`] - funcionários
//! - [`service_posts`] - postos de serviço e atividades configuradas
//! - [`activities`] - alteração de atividades por ID
//! - [`allocations`] - grade de alocação, lote, cópia de mês, CSV
//! - [`executions`] - execuções de atividade e anexos
//! - [`attachments`] - download/remoção de anexos
//! - [`ferias_licencas`] - férias e licenças
//! - [`occurrences`] - ocorrências
//! - [`documents`] - documentos
//! - [`reports`] - previsto × realizado
//! - [`audit_log`] - trilha de auditoria

pub mod auth;
pub mod health;
pub mod users;

pub mod employees;
pub mod service_posts;
pub mod activities;

pub mod allocations;
pub mod attachments;
pub mod executions;
pub mod ferias_licencas;
pub mod occurrences;
pub mod documents;

pub mod audit_log;
pub mod reports;

// Tipos comuns dos handlers
pub use crate::utils::{AppError, AppResult};
