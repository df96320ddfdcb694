//! Modelo de documento

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID do documento
pub type DocumentId = RecordId;

/// Documento do acervo do contrato
///
/// O arquivo em si (quando existe) é um [`Attachment`](super::Attachment)
/// cujo `owner` aponta para este registro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<DocumentId>,
    pub title: String,
    /// Categoria (contrato, ASO, certificado, ...)
    pub category: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub employee: Option<RecordId>,
    /// Emissão `YYYY-MM-DD` (opcional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    /// Validade `YYYY-MM-DD` (opcional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload de criação
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentCreate {
    pub title: String,
    pub category: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub employee: Option<RecordId>,
    pub issued_date: Option<String>,
    pub expiry_date: Option<String>,
    pub notes: Option<String>,
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
