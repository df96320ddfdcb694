//! Handlers de atividades (alteração/remoção por ID)
//!
//! A listagem e a criação vivem como sub-recurso do posto em
//! [`service_posts`](crate::api::service_posts).

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ServiceActivity, ServiceActivityUpdate};
use crate::db::repository::ServiceActivityRepository;
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "service_activity";

/// GET /api/activities/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ServiceActivity>> {
    let repo = ServiceActivityRepository::new(state.db.clone());
    let activity = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service activity {} not found", id)))?;
    Ok(Json(activity))
}

/// PUT /api/activities/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ServiceActivityUpdate>,
) -> AppResult<Json<ServiceActivity>> {
    let repo = ServiceActivityRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service activity {} not found", id)))?;
    let activity = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::ServiceActivityUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &activity, ENTITY),
        )
        .await;

    Ok(Json(activity))
}

/// DELETE /api/activities/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ServiceActivityRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service activity {} not found", id)))?;
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::ServiceActivityDeleted,
                ENTITY,
                id,
                Some(&current),
                diff::create_delete_details(&existing.name),
            )
            .await;
    }

    Ok(Json(result))
}
