//! Handlers de ocorrências

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Occurrence, OccurrenceCreate, OccurrenceUpdate};
use crate::db::repository::OccurrenceRepository;
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "occurrence";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub service_post: Option<String>,
}

/// GET /api/occurrences
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Occurrence>>> {
    let repo = OccurrenceRepository::new(state.db.clone());
    let rows = repo.find_all(query.service_post.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /api/occurrences/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Occurrence>> {
    let repo = OccurrenceRepository::new(state.db.clone());
    let occurrence = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Occurrence {} not found", id)))?;
    Ok(Json(occurrence))
}

/// POST /api/occurrences
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<OccurrenceCreate>,
) -> AppResult<Json<Occurrence>> {
    let repo = OccurrenceRepository::new(state.db.clone());
    let occurrence = repo.create(payload, &current.display_name).await?;

    let id = occurrence
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::OccurrenceCreated,
            ENTITY,
            id,
            Some(&current),
            diff::create_snapshot(&occurrence, ENTITY),
        )
        .await;

    Ok(Json(occurrence))
}

/// PUT /api/occurrences/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<OccurrenceUpdate>,
) -> AppResult<Json<Occurrence>> {
    let repo = OccurrenceRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Occurrence {} not found", id)))?;
    let occurrence = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::OccurrenceUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &occurrence, ENTITY),
        )
        .await;

    Ok(Json(occurrence))
}

/// DELETE /api/occurrences/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OccurrenceRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::OccurrenceDeleted,
                ENTITY,
                id,
                Some(&current),
                serde_json::json!({}),
            )
            .await;
    }

    Ok(Json(result))
}
