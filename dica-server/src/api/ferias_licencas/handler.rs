//! Handlers de férias e licenças

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::audit::{AuditAction, diff};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{FeriasLicencas, FeriasLicencasCreate, FeriasLicencasUpdate, LeaveStatus};
use crate::db::repository::FeriasLicencasRepository;
use crate::db::repository::ferias_licencas::LeaveFilter;
use crate::utils::{AppError, AppResult};

const ENTITY: &str = "ferias_licencas";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub employee: Option<String>,
    pub status: Option<LeaveStatus>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/ferias-licencas — lista com filtros
///
/// `from`/`to` retornam registros cujo período intersecta o intervalo.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<FeriasLicencas>>> {
    let period = match (query.from, query.to) {
        (Some(from), Some(to)) => Some((from, to)),
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "Both from and to are required for period filter".to_string(),
            ));
        }
    };

    let repo = FeriasLicencasRepository::new(state.db.clone());
    let rows = repo
        .find(LeaveFilter {
            employee: query.employee,
            status: query.status,
            period,
        })
        .await?;
    Ok(Json(rows))
}

/// GET /api/ferias-licencas/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<FeriasLicencas>> {
    let repo = FeriasLicencasRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave record {} not found", id)))?;
    Ok(Json(record))
}

/// POST /api/ferias-licencas
///
/// `start_date > end_date` é rejeitado com 400 antes de persistir.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<FeriasLicencasCreate>,
) -> AppResult<Json<FeriasLicencas>> {
    let repo = FeriasLicencasRepository::new(state.db.clone());
    let record = repo.create(payload).await?;

    let id = record.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    state
        .audit_service
        .log(
            AuditAction::LeaveCreated,
            ENTITY,
            id,
            Some(&current),
            diff::create_snapshot(&record, ENTITY),
        )
        .await;

    Ok(Json(record))
}

/// PUT /api/ferias-licencas/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<FeriasLicencasUpdate>,
) -> AppResult<Json<FeriasLicencas>> {
    let repo = FeriasLicencasRepository::new(state.db.clone());
    let before = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave record {} not found", id)))?;
    let record = repo.update(&id, payload).await?;

    state
        .audit_service
        .log(
            AuditAction::LeaveUpdated,
            ENTITY,
            id,
            Some(&current),
            diff::create_diff(&before, &record, ENTITY),
        )
        .await;

    Ok(Json(record))
}

/// DELETE /api/ferias-licencas/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = FeriasLicencasRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::LeaveDeleted,
                ENTITY,
                id,
                Some(&current),
                serde_json::json!({}),
            )
            .await;
    }

    Ok(Json(result))
}
