//! Trilha de auditoria — registro imutável de alterações
//!
//! # Arquitetura
//!
//! ```text
//! operação sensível
//!   ├─ AuditService::log() → mpsc → AuditWorker → SurrealDB (audit_log)
//!   └─ on_startup/on_shutdown → escrita direta (ciclo de vida)
//!
//! cadeia SHA256: genesis → entrada₁ → entrada₂ → ... → entradaₙ
//! ```
//!
//! # Garantias
//!
//! - **Cadeia SHA256**: cada entrada referencia o hash da anterior
//! - **Append-only**: sem interface de alteração/remoção
//! - **Diffs por campo**: updates registram `{changes: [...]}` calculado
//!   na escrita ([`diff`])
//! - **Verificação**: endpoint recalcula e confere a cadeia inteira

pub mod diff;
pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::{AuditLogRequest, AuditService};
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{
    AuditAction, AuditChainVerification, AuditEntry, AuditListResponse, AuditQuery,
};
pub use worker::AuditWorker;
