//! Modelo de férias e licenças

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID do registro
pub type FeriasLicencasId = RecordId;

/// Tipo do afastamento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Ferias,
    LicencaMedica,
    LicencaMaternidade,
    LicencaPaternidade,
    Outro,
}

/// Situação do pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

/// Registro de férias/licença de um funcionário
///
/// Invariante: `start_date <= end_date` (validado antes de persistir).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeriasLicencas {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FeriasLicencasId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    pub kind: LeaveKind,
    /// Início `YYYY-MM-DD`
    pub start_date: String,
    /// Fim `YYYY-MM-DD` (inclusivo)
    pub end_date: String,
    pub status: LeaveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// Payload de criação
#[derive(Debug, Clone, Deserialize)]
pub struct FeriasLicencasCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    pub kind: LeaveKind,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_status")]
    pub status: LeaveStatus,
    pub observations: Option<String>,
}

fn default_status() -> LeaveStatus {
    LeaveStatus::Pending
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeriasLicencasUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<LeaveKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeaveStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}
