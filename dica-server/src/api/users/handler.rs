//! Handlers de contas de acesso

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "user";

/// GET /api/users — contas ativas
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users))
}

/// GET /api/users/all — inclui desativadas
pub async fn list_with_inactive(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all_with_inactive().await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.create(payload).await?;

    let id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::UserCreated,
            ENTITY,
            id,
            Some(&current),
            diff::create_snapshot(&user, ENTITY),
        )
        .await;

    Ok(Json(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    let user = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::UserUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &user, ENTITY),
        )
        .await;

    Ok(Json(user))
}

/// DELETE /api/users/{id}
///
/// A própria conta não pode ser removida.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if id == current.id {
        return Err(AppError::business_rule(
            "Cannot delete your own account".to_string(),
        ));
    }

    let repo = UserRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::UserDeleted,
                ENTITY,
                id,
                Some(&current),
                diff::create_delete_details(&existing.username),
            )
            .await;
    }

    Ok(Json(result))
}
