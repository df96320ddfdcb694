//! Handlers da trilha de auditoria

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::audit::{AuditAction, AuditChainVerification, AuditListResponse, AuditQuery};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/admin/audit-logs — listagem filtrada e paginada
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    let (items, total) = state.audit_service.query(&query).await?;
    Ok(Json(AuditListResponse { items, total }))
}

/// GET /api/admin/audit-logs/entity-types — valores do filtro
pub async fn entity_types(State(state): State<ServerState>) -> AppResult<Json<Vec<String>>> {
    let types = state.audit_service.entity_types().await?;
    Ok(Json(types))
}

/// GET /api/admin/audit-logs/actions — valores do filtro
pub async fn actions() -> Json<Vec<String>> {
    Json(
        AuditAction::ALL
            .iter()
            .map(|a| a.to_string())
            .collect(),
    )
}

/// GET /api/admin/audit-logs/export — CSV com os mesmos filtros
pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let entries = state.audit_service.query_all(&query).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "sequence",
            "timestamp",
            "action",
            "entity_type",
            "entity_id",
            "operator_id",
            "operator_name",
            "details",
        ])
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;

    for entry in entries {
        writer
            .write_record([
                entry.id.to_string().as_str(),
                entry.timestamp.to_string().as_str(),
                entry.action.to_string().as_str(),
                entry.entity_type.as_str(),
                entry.entity_id.as_str(),
                entry.operator_id.as_deref().unwrap_or(""),
                entry.operator_name.as_deref().unwrap_or(""),
                entry.details.to_string().as_str(),
            ])
            .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    let body = String::from_utf8(data)
        .map_err(|e| AppError::internal(format!("CSV encoding failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"audit-logs.csv\"",
            ),
        ],
        body,
    ))
}

/// Parâmetros da verificação da cadeia
#[derive(Debug, serde::Deserialize)]
pub struct VerifyQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// GET /api/admin/audit-logs/verify — integridade da cadeia de hashes
pub async fn verify_chain(
    State(state): State<ServerState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<AuditChainVerification>> {
    let verification = state
        .audit_service
        .verify_chain(query.from, query.to)
        .await?;
    Ok(Json(verification))
}
