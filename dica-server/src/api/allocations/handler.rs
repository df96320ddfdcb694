//! Handlers da grade de alocação
//!
//! Grade mensal, salvamento em lote, cópia de competência e CSV.

use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Allocation, AllocationBatch, AllocationBatchResult, AllocationEntry, AllocationStatus,
    CopyMonthRequest, CopyMonthResult, CsvImportResult, CsvRowError,
};
use crate::db::repository::{AllocationRepository, EmployeeRepository};
use crate::utils::{AppError, AppResult, time};

const ENTITY: &str = "allocation";

/// Cabeçalho esperado do CSV de importação
const CSV_HEADER: &str = "employee_id,date,status";

// ============================================================================
// Query params e DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub service_post: Option<String>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub service_post: String,
    /// Competência `YYYY-MM`
    pub month: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    pub service_post: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub service_post: String,
    pub month: String,
}

/// Um dia da grade
#[derive(Debug, Serialize)]
pub struct GridDay {
    pub date: String,
    /// Destaque visual apenas; sem diferença de comportamento
    pub weekend: bool,
}

/// Célula preenchida da grade
#[derive(Debug, Serialize)]
pub struct GridCell {
    pub status: AllocationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Linha da grade (um funcionário ativo do posto)
#[derive(Debug, Serialize)]
pub struct GridRow {
    pub employee_id: String,
    pub name: String,
    pub funcao: String,
    /// Datas sem célula renderizam como não preenchidas ("-")
    pub cells: BTreeMap<String, GridCell>,
}

/// Grade completa de uma competência
#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub service_post: String,
    pub month: String,
    pub days: Vec<GridDay>,
    pub rows: Vec<GridRow>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/allocations — alocações em um intervalo de datas
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Allocation>>> {
    let repo = AllocationRepository::new(state.db.clone());
    let rows = repo
        .find_range(query.service_post.as_deref(), &query.from, &query.to)
        .await?;
    Ok(Json(rows))
}

/// GET /api/allocations/grid — grade mensal do posto
///
/// Uma linha por funcionário **ativo** do posto, uma coluna por dia da
/// competência. Funcionários inativos nunca entram.
pub async fn grid(
    State(state): State<ServerState>,
    Query(query): Query<GridQuery>,
) -> AppResult<Json<GridResponse>> {
    let (year, month) = time::parse_month(&query.month)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}", query.month)))?;

    let employee_repo = EmployeeRepository::new(state.db.clone());
    let allocation_repo = AllocationRepository::new(state.db.clone());

    let employees = employee_repo.find_active_by_post(&query.service_post).await?;
    let allocations = allocation_repo
        .find_month(&query.service_post, year, month)
        .await?;

    // indexa as alocações por funcionário
    let mut by_employee: BTreeMap<String, BTreeMap<String, GridCell>> = BTreeMap::new();
    for alloc in allocations {
        by_employee
            .entry(alloc.employee.to_string())
            .or_default()
            .insert(
                alloc.date,
                GridCell {
                    status: alloc.status,
                    notes: alloc.notes,
                },
            );
    }

    let days = time::month_days(year, month)
        .into_iter()
        .map(|d| GridDay {
            date: d.to_string(),
            weekend: time::is_weekend(d),
        })
        .collect();

    let rows = employees
        .into_iter()
        .map(|e| {
            let employee_id = e.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
            let cells = by_employee.remove(&employee_id).unwrap_or_default();
            GridRow {
                employee_id,
                name: e.name,
                funcao: e.funcao,
                cells,
            }
        })
        .collect();

    Ok(Json(GridResponse {
        service_post: query.service_post,
        month: query.month,
        days,
        rows,
    }))
}

/// POST /api/allocations/batch — aplica o buffer de edição da grade
///
/// Todas as células do lote entram em uma única transação: um lote com
/// qualquer entrada inválida não altera nada.
pub async fn batch_save(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(batch): Json<AllocationBatch>,
) -> AppResult<Json<AllocationBatchResult>> {
    let repo = AllocationRepository::new(state.db.clone());
    let post_id = batch.service_post.to_string();
    let saved = repo.batch_save(batch).await?;

    state
        .audit_service
        .log(
            AuditAction::AllocationBatchSaved,
            ENTITY,
            post_id.clone(),
            Some(&current),
            serde_json::json!({"service_post": post_id, "entries": saved}),
        )
        .await;

    Ok(Json(AllocationBatchResult { saved }))
}

/// POST /api/allocations/copy-month — copia a competência anterior
///
/// Operação em massa no servidor: substitui as linhas existentes da
/// competência alvo pelas da anterior, na mesma transação.
pub async fn copy_month(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CopyMonthRequest>,
) -> AppResult<Json<CopyMonthResult>> {
    let repo = AllocationRepository::new(state.db.clone());
    let post_id = req.service_post.to_string();
    let target_month = req.target_month.clone();
    let result = repo.copy_month(req).await?;

    state
        .audit_service
        .log(
            AuditAction::AllocationMonthCopied,
            ENTITY,
            post_id.clone(),
            Some(&current),
            serde_json::json!({
                "service_post": post_id,
                "target_month": target_month,
                "copied": result.copied,
                "dropped": result.dropped,
            }),
        )
        .await;

    Ok(Json(result))
}

/// POST /api/allocations/import-csv — importação em massa
///
/// Corpo: CSV com colunas `employee_id,date,status`. A semântica é por
/// linha: cada linha válida vira um upsert, cada inválida volta na
/// lista de erros e nunca cria alocação.
pub async fn import_csv(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> AppResult<Json<CsvImportResult>> {
    let post = query
        .service_post
        .parse::<surrealdb::RecordId>()
        .map_err(|_| AppError::validation(format!("Invalid service post: {}", query.service_post)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    // cabeçalho precisa bater com o template
    let headers = reader
        .headers()
        .map_err(|e| AppError::validation(format!("Invalid CSV: {}", e)))?;
    let header_line = headers.iter().collect::<Vec<_>>().join(",");
    if header_line != CSV_HEADER {
        return Err(AppError::validation(format!(
            "Invalid CSV header, expected: {}",
            CSV_HEADER
        )));
    }

    // cada entrada válida carrega a linha de origem do arquivo
    let mut entries: Vec<(usize, AllocationEntry)> = Vec::new();
    let mut errors: Vec<CsvRowError> = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(CsvRowError {
                    line,
                    message: format!("Malformed row: {}", e),
                });
                continue;
            }
        };

        if record.len() != 3 {
            errors.push(CsvRowError {
                line,
                message: format!("Expected 3 columns, got {}", record.len()),
            });
            continue;
        }

        let raw_employee = record.get(0).unwrap_or_default();
        let raw_date = record.get(1).unwrap_or_default();
        let raw_status = record.get(2).unwrap_or_default();

        // aceita "employee:xyz" ou só a chave
        let employee_str = if raw_employee.contains(':') {
            raw_employee.to_string()
        } else {
            format!("employee:{}", raw_employee)
        };
        let employee = match employee_str.parse::<surrealdb::RecordId>() {
            Ok(rid) if rid.table() == "employee" => rid,
            _ => {
                errors.push(CsvRowError {
                    line,
                    message: format!("Invalid employee_id: {}", raw_employee),
                });
                continue;
            }
        };

        if time::parse_date(raw_date).is_none() {
            errors.push(CsvRowError {
                line,
                message: format!("Invalid date: {}", raw_date),
            });
            continue;
        }

        let Some(status) = AllocationStatus::parse(raw_status) else {
            errors.push(CsvRowError {
                line,
                message: format!("Invalid status: {}", raw_status),
            });
            continue;
        };

        entries.push((
            line,
            AllocationEntry {
                employee,
                date: raw_date.to_string(),
                status,
                notes: None,
            },
        ));
    }

    // aplica linha a linha: a importação tem semântica por-linha (um
    // funcionário desconhecido invalida a própria linha, não o arquivo)
    let repo = AllocationRepository::new(state.db.clone());
    let mut imported = 0usize;
    for (line, entry) in entries {
        match repo
            .batch_save(AllocationBatch {
                service_post: post.clone(),
                entries: vec![entry],
            })
            .await
        {
            Ok(_) => imported += 1,
            Err(e) => errors.push(CsvRowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    errors.sort_by_key(|e| e.line);
    let result = CsvImportResult {
        imported,
        error_count: errors.len(),
        errors,
    };

    state
        .audit_service
        .log(
            AuditAction::AllocationCsvImported,
            ENTITY,
            query.service_post.clone(),
            Some(&current),
            serde_json::json!({
                "service_post": query.service_post,
                "imported": result.imported,
                "error_count": result.error_count,
            }),
        )
        .await;

    Ok(Json(result))
}

/// GET /api/allocations/template.csv — modelo de importação
pub async fn template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"allocations-template.csv\"",
            ),
        ],
        format!("{}\n", CSV_HEADER),
    )
}

/// GET /api/allocations/export.csv — exportação da competência
pub async fn export_csv(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let (year, month) = time::parse_month(&query.month)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}", query.month)))?;

    let employee_repo = EmployeeRepository::new(state.db.clone());
    let allocation_repo = AllocationRepository::new(state.db.clone());

    let employees = employee_repo.find_all_with_inactive().await?;
    let names: std::collections::HashMap<String, String> = employees
        .into_iter()
        .filter_map(|e| {
            e.id.as_ref()
                .map(|id| (id.to_string(), e.name.clone()))
        })
        .collect();

    let allocations = allocation_repo
        .find_month(&query.service_post, year, month)
        .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["employee_id", "employee_name", "date", "status", "notes"])
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    for alloc in allocations {
        let employee_id = alloc.employee.to_string();
        let name = names.get(&employee_id).cloned().unwrap_or_default();
        writer
            .write_record([
                employee_id.as_str(),
                name.as_str(),
                alloc.date.as_str(),
                alloc.status.as_str(),
                alloc.notes.as_deref().unwrap_or(""),
            ])
            .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV write failed: {}", e)))?;
    let body = String::from_utf8(data)
        .map_err(|e| AppError::internal(format!("CSV encoding failed: {}", e)))?;

    let filename = format!("allocations-{}.csv", query.month);
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}

/// DELETE /api/allocations/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = AllocationRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state
            .audit_service
            .log(
                AuditAction::AllocationDeleted,
                ENTITY,
                id,
                Some(&current),
                serde_json::json!({}),
            )
            .await;
    }

    Ok(Json(result))
}
