//! Modelo de posto de serviço

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID do posto
pub type ServicePostId = RecordId;

/// Posto de serviço do contrato
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePost {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ServicePostId>,
    /// Código do posto (único)
    pub code: String,
    pub name: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Payload de criação
#[derive(Debug, Clone, Deserialize)]
pub struct ServicePostCreate {
    pub code: String,
    pub name: String,
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
