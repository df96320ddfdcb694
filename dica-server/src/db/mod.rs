//! Camada de banco de dados
//!
//! SurrealDB embutido (RocksDB) com schema definido na inicialização.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Serviço de banco — dono da conexão embutida
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Abre (ou cria) o banco no caminho indicado e aplica o schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("dica")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready at {}", db_path);

        Ok(Self { db })
    }
}

/// Define tabelas e índices (idempotente)
///
/// Os índices UNIQUE materializam as chaves naturais do domínio:
/// uma alocação por funcionário/posto/data, uma execução por
/// atividade/data, CPF e código de posto únicos.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    const SCHEMA: &str = r#"
        DEFINE TABLE IF NOT EXISTS user;
        DEFINE INDEX IF NOT EXISTS user_username ON user FIELDS username UNIQUE;

        DEFINE TABLE IF NOT EXISTS employee;
        DEFINE INDEX IF NOT EXISTS employee_cpf ON employee FIELDS cpf UNIQUE;
        DEFINE INDEX IF NOT EXISTS employee_status ON employee FIELDS status;

        DEFINE TABLE IF NOT EXISTS service_post;
        DEFINE INDEX IF NOT EXISTS service_post_code ON service_post FIELDS code UNIQUE;

        DEFINE TABLE IF NOT EXISTS service_activity;
        DEFINE INDEX IF NOT EXISTS service_activity_post ON service_activity FIELDS service_post;

        DEFINE TABLE IF NOT EXISTS allocation;
        DEFINE INDEX IF NOT EXISTS allocation_key ON allocation FIELDS employee, service_post, date UNIQUE;
        DEFINE INDEX IF NOT EXISTS allocation_date ON allocation FIELDS date;

        DEFINE TABLE IF NOT EXISTS activity_execution;
        DEFINE INDEX IF NOT EXISTS execution_key ON activity_execution FIELDS service_activity, date UNIQUE;

        DEFINE TABLE IF NOT EXISTS attachment;
        DEFINE INDEX IF NOT EXISTS attachment_owner ON attachment FIELDS owner;

        DEFINE TABLE IF NOT EXISTS ferias_licencas;
        DEFINE INDEX IF NOT EXISTS ferias_employee ON ferias_licencas FIELDS employee;

        DEFINE TABLE IF NOT EXISTS occurrence;
        DEFINE TABLE IF NOT EXISTS document;

        DEFINE TABLE IF NOT EXISTS audit_log;
        DEFINE INDEX IF NOT EXISTS audit_sequence ON audit_log FIELDS sequence UNIQUE;
        DEFINE INDEX IF NOT EXISTS audit_timestamp ON audit_log FIELDS timestamp;
    "#;

    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

    Ok(())
}
