//! Handlers de documentos

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use crate::api::attachments::store;
use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Attachment, Document, DocumentCreate, DocumentUpdate};
use crate::db::repository::{AttachmentRepository, DocumentRepository};
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "document";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub employee: Option<String>,
}

/// GET /api/documents
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let repo = DocumentRepository::new(state.db.clone());
    let rows = repo.find_all(query.employee.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /api/documents/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Document>> {
    let repo = DocumentRepository::new(state.db.clone());
    let document = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", id)))?;
    Ok(Json(document))
}

/// POST /api/documents
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<DocumentCreate>,
) -> AppResult<Json<Document>> {
    let repo = DocumentRepository::new(state.db.clone());
    let document = repo.create(payload).await?;

    let id = document
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::DocumentCreated,
            ENTITY,
            id,
            Some(&current),
            diff::create_snapshot(&document, ENTITY),
        )
        .await;

    Ok(Json(document))
}

/// PUT /api/documents/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<DocumentUpdate>,
) -> AppResult<Json<Document>> {
    let repo = DocumentRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", id)))?;
    let document = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::DocumentUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &document, ENTITY),
        )
        .await;

    Ok(Json(document))
}

/// DELETE /api/documents/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = DocumentRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", id)))?;
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::DocumentDeleted,
                ENTITY,
                id,
                Some(&current),
                diff::create_delete_details(&existing.title),
            )
            .await;
    }

    Ok(Json(result))
}

// ============================================================================
// Arquivo do documento (sub-recurso)
// ============================================================================

/// GET /api/documents/{id}/attachments
pub async fn list_attachments(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Attachment>>> {
    let doc_repo = DocumentRepository::new(state.db.clone());
    let document = doc_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", id)))?;

    let owner = document
        .id
        .ok_or_else(|| AppError::internal("Document without ID".to_string()))?;
    let repo = AttachmentRepository::new(state.db.clone());
    let attachments = repo.find_by_owner(&owner).await?;
    Ok(Json(attachments))
}

/// POST /api/documents/{id}/attachments — upload multipart
pub async fn upload_attachment(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Attachment>> {
    let doc_repo = DocumentRepository::new(state.db.clone());
    let document = doc_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", id)))?;

    let owner = document
        .id
        .ok_or_else(|| AppError::internal("Document without ID".to_string()))?;
    let attachment = store::save_multipart_file(&state, owner, &current, multipart).await?;

    let attachment_id = attachment
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::AttachmentUploaded,
            "attachment",
            attachment_id,
            Some(&current),
            serde_json::json!({
                "owner": id,
                "original_name": attachment.original_name,
                "size": attachment.size,
            }),
        )
        .await;

    Ok(Json(attachment))
}
