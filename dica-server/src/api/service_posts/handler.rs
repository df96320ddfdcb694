//! Handlers de postos de serviço

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    ServiceActivity, ServiceActivityCreate, ServicePost, ServicePostCreate, ServicePostUpdate,
};
use crate::db::repository::{ServiceActivityRepository, ServicePostRepository};
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "service_post";

/// GET /api/service-posts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ServicePost>>> {
    let repo = ServicePostRepository::new(state.db.clone());
    let posts = repo.find_all().await?;
    Ok(Json(posts))
}

/// GET /api/service-posts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ServicePost>> {
    let repo = ServicePostRepository::new(state.db.clone());
    let post = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service post {} not found", id)))?;
    Ok(Json(post))
}

/// POST /api/service-posts
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ServicePostCreate>,
) -> AppResult<Json<ServicePost>> {
    let repo = ServicePostRepository::new(state.db.clone());
    let post = repo.create(payload).await?;

    let id = post.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::ServicePostCreated,
            ENTITY,
            id,
            Some(&current),
            diff::create_snapshot(&post, ENTITY),
        )
        .await;

    Ok(Json(post))
}

/// PUT /api/service-posts/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ServicePostUpdate>,
) -> AppResult<Json<ServicePost>> {
    let repo = ServicePostRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service post {} not found", id)))?;
    let post = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::ServicePostUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &post, ENTITY),
        )
        .await;

    Ok(Json(post))
}

/// DELETE /api/service-posts/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ServicePostRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Service post {} not found", id)))?;
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::ServicePostDeleted,
                ENTITY,
                id,
                Some(&current),
                diff::create_delete_details(&existing.name),
            )
            .await;
    }

    Ok(Json(result))
}

// ============================================================================
// Atividades configuradas (sub-recurso)
// ============================================================================

/// GET /api/service-posts/{id}/activities
pub async fn list_activities(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ServiceActivity>>> {
    let repo = ServiceActivityRepository::new(state.db.clone());
    let activities = repo.find_by_post(&id).await?;
    Ok(Json(activities))
}

/// POST /api/service-posts/{id}/activities
pub async fn create_activity(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ServiceActivityCreate>,
) -> AppResult<Json<ServiceActivity>> {
    let repo = ServiceActivityRepository::new(state.db.clone());
    let activity = repo.create(&id, payload).await?;

    let activity_id = activity
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::ServiceActivityCreated,
            "service_activity",
            activity_id,
            Some(&current),
            diff::create_snapshot(&activity, "service_activity"),
        )
        .await;

    Ok(Json(activity))
}
