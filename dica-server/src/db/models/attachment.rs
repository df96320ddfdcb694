//! Modelo de anexo (arquivo enviado)

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID do anexo
pub type AttachmentId = RecordId;

/// Arquivo anexado a uma execução de atividade ou a um documento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<AttachmentId>,
    /// Registro dono (activity_execution ou document)
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    /// Nome original do arquivo enviado
    pub original_name: String,
    /// Nome no disco (uuid + extensão)
    pub stored_name: String,
    /// Tamanho em bytes
    pub size: i64,
    /// SHA256 do conteúdo (deduplicação)
    pub sha256: String,
    pub content_type: String,
    /// Quem enviou
    pub uploaded_by: String,
    /// Timestamp de envio (millis)
    pub uploaded_at: i64,
}
