//! Modelo de atividade recorrente de um posto

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID da atividade
pub type ServiceActivityId = RecordId;

/// Frequência prevista da atividade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityFrequency {
    Daily,
    Weekly,
    Monthly,
    OnDemand,
}

/// Atividade recorrente configurada em um posto de serviço
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceActivity {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ServiceActivityId>,
    /// Posto dono da atividade
    #[serde(with = "serde_helpers::record_id")]
    pub service_post: RecordId,
    pub name: String,
    pub frequency: ActivityFrequency,
    /// Unidade de medida (PPU): contagem, horas etc.
    pub unit: String,
    /// Quantidade prevista por ocorrência (opcional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_quantity: Option<i64>,
}

/// Payload de criação (o posto vem da rota)
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceActivityCreate {
    pub name: String,
    pub frequency: ActivityFrequency,
    pub unit: String,
    pub expected_quantity: Option<i64>,
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<ActivityFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_quantity: Option<i64>,
}
