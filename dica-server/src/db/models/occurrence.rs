//! Modelo de ocorrência

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID da ocorrência
pub type OccurrenceId = RecordId;

/// Gravidade da ocorrência
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Ocorrência registrada no contrato
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OccurrenceId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub employee: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub service_post: Option<RecordId>,
    /// Data `YYYY-MM-DD`
    pub date: String,
    /// Tipo (texto livre: atraso, acidente, etc.)
    pub kind: String,
    pub description: String,
    pub severity: Severity,
    /// Quem registrou
    pub reported_by: String,
}

/// Payload de criação (reported_by vem do usuário autenticado)
#[derive(Debug, Clone, Deserialize)]
pub struct OccurrenceCreate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub employee: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub service_post: Option<RecordId>,
    pub date: String,
    pub kind: String,
    pub description: String,
    pub severity: Severity,
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}
