//! Serviço de auditoria
//!
//! `AuditService` é a fachada da trilha de auditoria:
//! - escrita assíncrona via canal mpsc (consumido pelo worker)
//! - consultas diretas ao armazenamento
//! - verificação da cadeia
//! - ciclo de vida (arquivo LOCK detecta encerramento anormal)

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use super::storage::{AuditStorage, AuditStorageError};
use super::types::*;
use crate::auth::CurrentUser;

/// Nome do arquivo LOCK
const LOCK_FILE_NAME: &str = "audit.lock";

/// Requisição de escrita enviada ao worker
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// Serviço de auditoria
///
/// As escritas passam por um canal mpsc e são gravadas pelo worker em
/// background; consultas leem o armazenamento direto.
///
/// ## Arquivo LOCK
///
/// Na partida o serviço grava `audit.lock` com o timestamp atual e o
/// remove no encerramento normal. Se o arquivo já existe na partida,
/// o encerramento anterior foi anormal e o fato entra na trilha.
pub struct AuditService {
    storage: AuditStorage,
    tx: mpsc::Sender<AuditLogRequest>,
    lock_path: PathBuf,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService")
            .field("lock_path", &self.lock_path)
            .finish_non_exhaustive()
    }
}

impl AuditService {
    /// Cria o serviço
    ///
    /// `data_dir` — diretório de dados (local do arquivo LOCK)
    pub fn new(
        db: Surreal<Db>,
        data_dir: &std::path::Path,
        buffer_size: usize,
    ) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let lock_path = data_dir.join(LOCK_FILE_NAME);
        let storage = AuditStorage::new(db);
        let service = Arc::new(Self {
            storage,
            tx,
            lock_path,
        });
        (service, rx)
    }

    /// Chamado na partida — detecta encerramento anormal e cria o LOCK
    pub async fn on_startup(&self) {
        let now = shared::util::now_millis();

        // 1. LOCK presente = encerramento anormal da execução anterior
        if self.lock_path.exists() {
            let lock_content = std::fs::read_to_string(&self.lock_path).unwrap_or_default();
            let last_start_ts: i64 = lock_content.trim().parse().unwrap_or(0);

            tracing::warn!(
                "Abnormal shutdown detected — LOCK file exists (last start: {})",
                last_start_ts
            );

            let details = serde_json::json!({
                "last_start_timestamp": last_start_ts,
                "detected_at": now,
            });

            if let Err(e) = self
                .storage
                .append(
                    AuditAction::SystemAbnormalShutdown,
                    "system".to_string(),
                    "server:main".to_string(),
                    None,
                    None,
                    details,
                )
                .await
            {
                tracing::error!("Failed to log abnormal shutdown: {:?}", e);
            }
        }

        // 2. partida normal
        if let Err(e) = self
            .storage
            .append(
                AuditAction::SystemStartup,
                "system".to_string(),
                "server:main".to_string(),
                None,
                None,
                serde_json::json!({"started_at": now}),
            )
            .await
        {
            tracing::error!("Failed to log startup: {:?}", e);
        }

        // 3. cria o LOCK
        if let Err(e) = std::fs::write(&self.lock_path, now.to_string()) {
            tracing::error!("Failed to create audit LOCK file: {:?}", e);
        }
    }

    /// Chamado no encerramento normal — registra e remove o LOCK
    pub async fn on_shutdown(&self) {
        if let Err(e) = self
            .storage
            .append(
                AuditAction::SystemShutdown,
                "system".to_string(),
                "server:main".to_string(),
                None,
                None,
                serde_json::json!({"stopped_at": shared::util::now_millis()}),
            )
            .await
        {
            tracing::error!("Failed to log shutdown: {:?}", e);
        }

        if let Err(e) = std::fs::remove_file(&self.lock_path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::error!("Failed to remove audit LOCK file: {:?}", e);
        }
    }

    /// Registra uma entrada (assíncrono, não bloqueia o handler)
    ///
    /// Envia pelo canal mpsc ao worker. Canal cheio bloqueia o envio —
    /// entrada de auditoria não pode se perder.
    pub async fn log(
        &self,
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        operator: Option<&CurrentUser>,
        details: serde_json::Value,
    ) {
        let req = AuditLogRequest {
            action,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            operator_id: operator.map(|u| u.id.clone()),
            operator_name: operator.map(|u| u.display_name.clone()),
            details,
        };

        if self.tx.send(req).await.is_err() {
            tracing::error!("Audit log channel closed — audit entry lost!");
        }
    }

    /// Consulta paginada
    pub async fn query(&self, q: &AuditQuery) -> Result<(Vec<AuditEntry>, u64), AuditStorageError> {
        self.storage.query(q).await
    }

    /// Consulta completa (exportação)
    pub async fn query_all(&self, q: &AuditQuery) -> Result<Vec<AuditEntry>, AuditStorageError> {
        self.storage.query_all(q).await
    }

    /// Tipos de entidade presentes no log
    pub async fn entity_types(&self) -> Result<Vec<String>, AuditStorageError> {
        self.storage.distinct_entity_types().await
    }

    /// Verifica a integridade da cadeia
    pub async fn verify_chain(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<AuditChainVerification, AuditStorageError> {
        self.storage.verify_chain(from, to).await
    }

    /// Referência ao armazenamento
    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }
}
