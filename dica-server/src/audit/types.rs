//! Tipos do log de auditoria
//!
//! Estruturas centrais da trilha de auditoria. Todas as entradas são
//! imutáveis e encadeadas por hash SHA256.

use serde::{Deserialize, Serialize};

/// Ação auditada (enum fechado, nunca texto livre)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ Ciclo de vida do sistema ═══
    /// Servidor iniciado
    SystemStartup,
    /// Servidor encerrado normalmente
    SystemShutdown,
    /// Encerramento anormal detectado na partida seguinte
    SystemAbnormalShutdown,

    // ═══ Autenticação ═══
    LoginSuccess,
    LoginFailed,
    Logout,

    // ═══ Contas ═══
    UserCreated,
    UserUpdated,
    UserDeleted,

    // ═══ Funcionários ═══
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeDeleted,

    // ═══ Postos e atividades ═══
    ServicePostCreated,
    ServicePostUpdated,
    ServicePostDeleted,
    ServiceActivityCreated,
    ServiceActivityUpdated,
    ServiceActivityDeleted,

    // ═══ Alocação diária ═══
    /// Lote da grade salvo (transacional)
    AllocationBatchSaved,
    /// Competência copiada da anterior
    AllocationMonthCopied,
    /// CSV importado
    AllocationCsvImported,
    AllocationDeleted,

    // ═══ Execuções de atividade ═══
    ExecutionCreated,
    ExecutionUpdated,
    ExecutionDeleted,
    AttachmentUploaded,
    AttachmentDeleted,

    // ═══ Férias e licenças ═══
    LeaveCreated,
    LeaveUpdated,
    LeaveDeleted,

    // ═══ Ocorrências e documentos ═══
    OccurrenceCreated,
    OccurrenceUpdated,
    OccurrenceDeleted,
    DocumentCreated,
    DocumentUpdated,
    DocumentDeleted,
}

impl AuditAction {
    /// Todas as ações, para o dropdown de filtro da interface
    pub const ALL: &'static [AuditAction] = &[
        AuditAction::SystemStartup,
        AuditAction::SystemShutdown,
        AuditAction::SystemAbnormalShutdown,
        AuditAction::LoginSuccess,
        AuditAction::LoginFailed,
        AuditAction::Logout,
        AuditAction::UserCreated,
        AuditAction::UserUpdated,
        AuditAction::UserDeleted,
        AuditAction::EmployeeCreated,
        AuditAction::EmployeeUpdated,
        AuditAction::EmployeeDeleted,
        AuditAction::ServicePostCreated,
        AuditAction::ServicePostUpdated,
        AuditAction::ServicePostDeleted,
        AuditAction::ServiceActivityCreated,
        AuditAction::ServiceActivityUpdated,
        AuditAction::ServiceActivityDeleted,
        AuditAction::AllocationBatchSaved,
        AuditAction::AllocationMonthCopied,
        AuditAction::AllocationCsvImported,
        AuditAction::AllocationDeleted,
        AuditAction::ExecutionCreated,
        AuditAction::ExecutionUpdated,
        AuditAction::ExecutionDeleted,
        AuditAction::AttachmentUploaded,
        AuditAction::AttachmentDeleted,
        AuditAction::LeaveCreated,
        AuditAction::LeaveUpdated,
        AuditAction::LeaveDeleted,
        AuditAction::OccurrenceCreated,
        AuditAction::OccurrenceUpdated,
        AuditAction::OccurrenceDeleted,
        AuditAction::DocumentCreated,
        AuditAction::DocumentUpdated,
        AuditAction::DocumentDeleted,
    ];
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // snake_case, igual ao formato persistido
        let s = serde_json::to_string(self).unwrap_or_default();
        f.write_str(s.trim_matches('"'))
    }
}

/// Entrada do log de auditoria (imutável)
///
/// Cada registro participa de uma cadeia SHA256:
/// - `prev_hash`: hash do registro anterior
/// - `curr_hash`: hash deste registro (inclui prev_hash + campos)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Sequência global crescente
    pub id: u64,
    /// Timestamp (Unix millis)
    pub timestamp: i64,
    pub action: AuditAction,
    /// Tipo da entidade ("employee", "allocation", ...)
    pub entity_type: String,
    /// ID da entidade ("employee:xyz", ...)
    pub entity_id: String,
    /// Quem executou (None em eventos de sistema)
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    /// Detalhes estruturados: snapshot, diff `{changes: [...]}` ou marcador
    pub details: serde_json::Value,
    /// Hash do registro anterior
    pub prev_hash: String,
    /// Hash deste registro (SHA256)
    pub curr_hash: String,
}

/// Parâmetros de consulta do log
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// Início (Unix millis, inclusivo)
    pub from: Option<i64>,
    /// Fim (Unix millis, inclusivo)
    pub to: Option<i64>,
    pub action: Option<AuditAction>,
    pub operator_id: Option<String>,
    pub entity_type: Option<String>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            action: None,
            operator_id: None,
            entity_type: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// Resposta da listagem
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}

/// Resultado da verificação da cadeia
#[derive(Debug, Serialize)]
pub struct AuditChainVerification {
    pub total_entries: u64,
    pub chain_intact: bool,
    pub breaks: Vec<AuditChainBreak>,
}

/// Ponto de quebra da cadeia
#[derive(Debug, Serialize)]
pub struct AuditChainBreak {
    /// Sequência onde a quebra foi detectada
    pub entry_id: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}
