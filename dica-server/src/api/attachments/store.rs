//! Armazenamento de anexos em disco
//!
//! Arquivos vivem em `work_dir/uploads/` com nome `uuid.ext`; o
//! registro no banco guarda o nome original e o SHA256 do conteúdo.
//! Conteúdo repetido reaproveita o arquivo existente (dedup por hash).

use std::fs;
use std::path::PathBuf;

use axum::extract::Multipart;
use sha2::{Digest, Sha256};
use surrealdb::RecordId;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Attachment;
use crate::db::repository::AttachmentRepository;
use crate::utils::AppError;

/// SHA256 em hex do conteúdo
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Caminho no disco de um arquivo salvo
pub fn file_path(state: &ServerState, stored_name: &str) -> PathBuf {
    state.config.uploads_dir().join(stored_name)
}

/// Lê o campo `file` de um multipart e persiste como anexo do `owner`
///
/// - limite de tamanho via `MAX_UPLOAD_MB`
/// - dedup: conteúdo já conhecido reaproveita o arquivo no disco
pub async fn save_multipart_file(
    state: &ServerState,
    owner: RecordId,
    user: &CurrentUser,
    mut multipart: Multipart,
) -> Result<Attachment, AppError> {
    let uploads_dir = state.config.uploads_dir();
    fs::create_dir_all(&uploads_dir)
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {}", e)))?;

    // localiza o campo "file"
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_name = None;

    while let Some(f) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = f.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_name = f.file_name().map(|s| s.to_string());
            field_data = Some(
                f.bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'".to_string())
    })?;
    let original_name = original_name
        .ok_or_else(|| AppError::validation("No filename provided in file field".to_string()))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided".to_string()));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let ext = PathBuf::from(&original_name)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()));

    let sha256 = calculate_hash(&data);
    let content_type = mime_guess::from_path(&original_name)
        .first_or_octet_stream()
        .to_string();

    let repo = AttachmentRepository::new(state.db.clone());

    // conteúdo idêntico já salvo: reaproveita o arquivo no disco
    let stored_name = match repo.find_by_hash(&sha256).await? {
        Some(existing) => {
            tracing::info!(
                original_name = %original_name,
                existing_file = %existing.stored_name,
                "Duplicate content detected, reusing stored file"
            );
            existing.stored_name
        }
        None => {
            let stored_name = match ext {
                Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
                None => Uuid::new_v4().to_string(),
            };
            let path = uploads_dir.join(&stored_name);
            fs::write(&path, &data)
                .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;
            stored_name
        }
    };

    let attachment = repo
        .create(Attachment {
            id: None,
            owner,
            original_name: original_name.clone(),
            stored_name,
            size: data.len() as i64,
            sha256: sha256.clone(),
            content_type,
            uploaded_by: user.id.clone(),
            uploaded_at: shared::util::now_millis(),
        })
        .await?;

    tracing::info!(
        original_name = %original_name,
        size = data.len(),
        hash = %sha256,
        "File uploaded successfully"
    );

    Ok(attachment)
}

/// Remove o arquivo do disco se nenhum outro anexo referencia o hash
pub async fn remove_file_if_unreferenced(
    state: &ServerState,
    deleted: &Attachment,
) -> Result<(), AppError> {
    let repo = AttachmentRepository::new(state.db.clone());
    if repo.hash_still_referenced(&deleted.sha256).await? {
        return Ok(());
    }

    let path = file_path(state, &deleted.stored_name);
    if let Err(e) = fs::remove_file(&path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::error!("Failed to remove stored file {:?}: {}", path, e);
    }
    Ok(())
}
