//! Modelo de alocação diária
//!
//! Uma alocação registra a situação de um funcionário em um posto em
//! uma data. A chave (employee, service_post, date) é única — o banco
//! mantém um índice UNIQUE e as escritas fazem upsert sobre ela.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID da alocação
pub type AllocationId = RecordId;

/// Situação do funcionário na data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Present,
    Absent,
    Justified,
    Vacation,
    MedicalLeave,
}

impl AllocationStatus {
    /// Interpreta o valor textual usado no CSV e na API
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "justified" => Some(Self::Justified),
            "vacation" => Some(Self::Vacation),
            "medical_leave" => Some(Self::MedicalLeave),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Justified => "justified",
            Self::Vacation => "vacation",
            Self::MedicalLeave => "medical_leave",
        }
    }
}

/// Alocação de um funcionário em um posto/data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AllocationId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub service_post: RecordId,
    /// Data `YYYY-MM-DD`
    pub date: String,
    pub status: AllocationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Uma célula editada da grade (upsert sobre employee+date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationEntry {
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    /// Data `YYYY-MM-DD`
    pub date: String,
    pub status: AllocationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Lote de edições da grade, aplicado em uma transação
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationBatch {
    #[serde(with = "serde_helpers::record_id")]
    pub service_post: RecordId,
    pub entries: Vec<AllocationEntry>,
}

/// Resultado do salvamento em lote
#[derive(Debug, Serialize)]
pub struct AllocationBatchResult {
    pub saved: usize,
}

/// Requisição de cópia de competência
#[derive(Debug, Clone, Deserialize)]
pub struct CopyMonthRequest {
    #[serde(with = "serde_helpers::record_id")]
    pub service_post: RecordId,
    /// Competência de destino `YYYY-MM` (a origem é a anterior)
    pub target_month: String,
}

/// Resultado da cópia de competência
#[derive(Debug, Serialize)]
pub struct CopyMonthResult {
    pub copied: usize,
    /// Linhas da origem cujo dia não existe na competência destino
    pub dropped: usize,
}

/// Erro de uma linha do CSV importado
#[derive(Debug, Clone, Serialize)]
pub struct CsvRowError {
    /// Linha do arquivo (1 = primeira linha de dados)
    pub line: usize,
    pub message: String,
}

/// Resultado da importação de CSV
#[derive(Debug, Serialize)]
pub struct CsvImportResult {
    pub imported: usize,
    pub error_count: usize,
    pub errors: Vec<CsvRowError>,
}
