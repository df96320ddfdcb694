//! Handlers de execuções de atividade

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use crate::api::attachments::store;
use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    ActivityExecution, ActivityExecutionCreate, ActivityExecutionUpdate, Attachment,
};
use crate::db::repository::{ActivityExecutionRepository, AttachmentRepository};
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "activity_execution";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub service_post: String,
    pub from: String,
    pub to: String,
}

/// GET /api/activity-executions — execuções do posto no intervalo
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ActivityExecution>>> {
    let repo = ActivityExecutionRepository::new(state.db.clone());
    let rows = repo
        .find_by_post_range(&query.service_post, &query.from, &query.to)
        .await?;
    Ok(Json(rows))
}

/// GET /api/activity-executions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActivityExecution>> {
    let repo = ActivityExecutionRepository::new(state.db.clone());
    let execution = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Execution {} not found", id)))?;
    Ok(Json(execution))
}

/// POST /api/activity-executions
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ActivityExecutionCreate>,
) -> AppResult<Json<ActivityExecution>> {
    let repo = ActivityExecutionRepository::new(state.db.clone());
    let execution = repo.create(payload).await?;

    let id = execution
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::ExecutionCreated,
            ENTITY,
            id,
            Some(&current),
            diff::create_snapshot(&execution, ENTITY),
        )
        .await;

    Ok(Json(execution))
}

/// PUT /api/activity-executions/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ActivityExecutionUpdate>,
) -> AppResult<Json<ActivityExecution>> {
    let repo = ActivityExecutionRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Execution {} not found", id)))?;
    let execution = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::ExecutionUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &execution, ENTITY),
        )
        .await;

    Ok(Json(execution))
}

/// DELETE /api/activity-executions/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ActivityExecutionRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::ExecutionDeleted,
                ENTITY,
                id,
                Some(&current),
                serde_json::json!({}),
            )
            .await;
    }

    Ok(Json(result))
}

// ============================================================================
// Anexos (sub-recurso)
// ============================================================================

/// GET /api/activity-executions/{id}/attachments
pub async fn list_attachments(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Attachment>>> {
    let exec_repo = ActivityExecutionRepository::new(state.db.clone());
    let execution = exec_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Execution {} not found", id)))?;

    let owner = execution
        .id
        .ok_or_else(|| AppError::internal("Execution without ID".to_string()))?;
    let repo = AttachmentRepository::new(state.db.clone());
    let attachments = repo.find_by_owner(&owner).await?;
    Ok(Json(attachments))
}

/// POST /api/activity-executions/{id}/attachments — upload multipart
pub async fn upload_attachment(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Attachment>> {
    let exec_repo = ActivityExecutionRepository::new(state.db.clone());
    let execution = exec_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Execution {} not found", id)))?;

    let owner = execution
        .id
        .ok_or_else(|| AppError::internal("Execution without ID".to_string()))?;
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
