//! Handlers de anexos (download e remoção por ID)

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use super::store;
use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::AttachmentRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/attachments/{id}/download
pub async fn download(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let repo = AttachmentRepository::new(state.db.clone());
    let attachment = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attachment {} not found", id)))?;

    let path = store::file_path(&state, &attachment.stored_name);
    let data = std::fs::read(&path)
        .map_err(|e| AppError::internal(format!("Failed to read stored file: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, attachment.content_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", attachment.original_name),
            ),
        ],
        data,
    ))
}

/// DELETE /api/attachments/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = AttachmentRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;

    store::remove_file_if_unreferenced(&state, &deleted).await?;

    state
        .audit_service
        .log(
            AuditAction::AttachmentDeleted,
            "attachment",
            id,
            Some(&current),
            serde_json::json!({"original_name": deleted.original_name}),
        )
        .await;

    Ok(Json(true))
}
