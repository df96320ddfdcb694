//! Modelo de execução de atividade

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID da execução
pub type ActivityExecutionId = RecordId;

/// Execução registrada de uma atividade em uma data
///
/// A chave (service_activity, date) é única: existe no máximo um
/// lançamento por atividade por dia.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityExecution {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ActivityExecutionId>,
    #[serde(with = "serde_helpers::record_id")]
    pub service_activity: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub service_post: RecordId,
    /// Data `YYYY-MM-DD`
    pub date: String,
    /// Quantidade executada (inteiro não negativo)
    pub quantity: i64,
    /// Responsável (opcional)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub employee: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload de criação
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityExecutionCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub service_activity: RecordId,
    pub date: String,
    pub quantity: i64,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub employee: Option<RecordId>,
    pub notes: Option<String>,
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityExecutionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub employee: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
