use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::audit::{AuditLogRequest, AuditService, AuditWorker};
use crate::auth::{JwtService, Role};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::UserCreate;
use crate::db::repository::UserRepository;

/// Estado do servidor - referências compartilhadas de todos os serviços
///
/// `ServerState` é clonável (Arc por dentro) e injetado nos handlers
/// pelo axum.
///
/// | Campo | Tipo | Descrição |
/// |-------|------|-----------|
/// | config | Config | configuração (imutável) |
/// | db | Surreal<Db> | banco embutido |
/// | jwt_service | Arc<JwtService> | tokens de sessão |
/// | audit_service | Arc<AuditService> | trilha de auditoria |
#[derive(Clone)]
pub struct ServerState {
    /// Configuração do servidor
    pub config: Config,
    /// Banco embutido (SurrealDB)
    pub db: Surreal<Db>,
    /// Serviço JWT (Arc compartilhado)
    pub jwt_service: Arc<JwtService>,
    /// Trilha de auditoria
    pub audit_service: Arc<AuditService>,
    /// Receiver do worker de auditoria (consumido por start_background_tasks)
    audit_rx: Arc<std::sync::Mutex<Option<mpsc::Receiver<AuditLogRequest>>>>,
}

impl ServerState {
    /// Inicializa o estado do servidor
    ///
    /// Ordem:
    /// 1. estrutura do work_dir
    /// 2. banco (work_dir/database/dica.db)
    /// 3. serviços (JWT, auditoria)
    /// 4. seed da conta admin em desenvolvimento
    ///
    /// # Panics
    ///
    /// Falha de inicialização do banco é fatal.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("dica.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let (audit_service, audit_rx) = AuditService::new(
            db.clone(),
            &PathBuf::from(&config.work_dir),
            config.audit_buffer_size,
        );

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            audit_service,
            audit_rx: Arc::new(std::sync::Mutex::new(Some(audit_rx))),
        };

        state.seed_default_admin().await;

        state
    }

    /// Inicia as tarefas de background
    ///
    /// Deve ser chamado antes de `Server::run()` aceitar requisições:
    /// - worker da trilha de auditoria
    /// - detecção de encerramento anormal (LOCK)
    pub async fn start_background_tasks(&self) {
        let rx = self
            .audit_rx
            .lock()
            .expect("audit receiver lock poisoned")
            .take();

        match rx {
            Some(rx) => {
                let worker = AuditWorker::new(self.audit_service.storage().clone());
                tokio::spawn(worker.run(rx));
            }
            None => {
                tracing::warn!("Audit worker already started, skipping");
            }
        }

        self.audit_service.on_startup().await;
    }

    /// Cria a conta admin inicial quando não existe nenhuma conta
    ///
    /// Somente em desenvolvimento; em produção as contas vêm do
    /// provisionamento.
    async fn seed_default_admin(&self) {
        if !self.config.is_development() {
            return;
        }

        let repo = UserRepository::new(self.db.clone());
        match repo.count().await {
            Ok(0) => {
                let result = repo
                    .create(UserCreate {
                        username: "admin".to_string(),
                        password: "admin".to_string(),
                        display_name: Some("Administrador".to_string()),
                        role: Role::Admin,
                    })
                    .await;
                match result {
                    Ok(_) => tracing::warn!(
                        "Seeded default admin account (admin/admin) — development only"
                    ),
                    Err(e) => tracing::error!("Failed to seed admin account: {}", e),
                }
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Failed to count user accounts: {}", e),
        }
    }

    /// Banco de dados
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Diretório de trabalho
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Serviço JWT
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
