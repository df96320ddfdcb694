//! Camada de repositórios
//!
//! Operações CRUD sobre as tabelas do SurrealDB, uma struct por tabela.

// Contas e mão de obra
pub mod employee;
pub mod user;

// Postos e atividades
pub mod service_activity;
pub mod service_post;

// Alocação diária
pub mod allocation;

// Execuções e anexos
pub mod activity_execution;
pub mod attachment;

// Afastamentos, ocorrências e documentos
pub mod document;
pub mod ferias_licencas;
pub mod occurrence;

// Re-exports
pub use activity_execution::ActivityExecutionRepository;
pub use allocation::AllocationRepository;
pub use attachment::AttachmentRepository;
pub use document::DocumentRepository;
pub use employee::EmployeeRepository;
pub use ferias_licencas::FeriasLicencasRepository;
pub use occurrence::OccurrenceRepository;
pub use service_activity::ServiceActivityRepository;
pub use service_post::ServicePostRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Erros de repositório
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result das operações de repositório
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// Convenção de ID: "table:id" em toda a pilha
// =============================================================================
//
// surrealdb::RecordId cobre todos os usos:
//   - parse: let id: RecordId = "employee:abc".parse()?;
//   - criação: RecordId::from_table_key("employee", "abc")
//   - CRUD: db.select(id) / db.delete(id) aceitam RecordId direto

/// Repositório base com a referência ao banco
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Interpreta um ID "table:id", validando a tabela esperada
    pub fn parse_id(&self, table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
        let rid: surrealdb::RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if rid.table() != table {
            return Err(RepoError::Validation(format!(
                "Expected {} ID, got: {}",
                table, id
            )));
        }
        Ok(rid)
    }
}
