//! Handlers de relatórios (previsto × realizado)
//!
//! Agregação feita no servidor em uma passada por consulta: total do
//! mês, quebra por posto e série diária. O cliente apenas renderiza.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::ServicePostRepository;
use crate::utils::{AppError, AppResult, time};

// ============================================================================
// Tipos de resposta
// ============================================================================

/// Totais da competência
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceSummary {
    /// Pessoas-dia planejadas (linhas de alocação)
    pub previsto: i64,
    /// Pessoas-dia realizadas (status `present`)
    pub realizado: i64,
    /// round(realizado / previsto × 100); 0 quando previsto = 0
    pub compliance: i64,
}

/// Quebra por posto de serviço
#[derive(Debug, Clone, Serialize)]
pub struct PostCompliance {
    pub service_post: String,
    pub post_name: String,
    pub previsto: i64,
    pub realizado: i64,
    pub compliance: i64,
}

/// Ponto da série diária
#[derive(Debug, Clone, Serialize)]
pub struct DateCompliance {
    pub date: String,
    pub previsto: i64,
    pub realizado: i64,
    pub compliance: i64,
}

/// Resposta completa do relatório
#[derive(Debug, Serialize)]
pub struct PrevistoRealizadoResponse {
    pub month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_post: Option<String>,
    pub summary: ComplianceSummary,
    pub by_post: Vec<PostCompliance>,
    pub by_date: Vec<DateCompliance>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Competência `YYYY-MM`
    pub month: String,
    /// Filtro opcional de posto
    pub service_post: Option<String>,
}

/// Percentual de cumprimento, inteiro arredondado
///
/// Política de divisão por zero: plano vazio não tem cumprimento,
/// retorna 0.
pub fn compliance_pct(previsto: i64, realizado: i64) -> i64 {
    if previsto <= 0 {
        return 0;
    }
    ((realizado as f64 / previsto as f64) * 100.0).round() as i64
}

/// Linha agregada vinda do banco
#[derive(Debug, Deserialize)]
struct PostAggRow {
    service_post: surrealdb::RecordId,
    previsto: i64,
    realizado: i64,
}

#[derive(Debug, Deserialize)]
struct DateAggRow {
    date: String,
    previsto: i64,
    realizado: i64,
}

// ============================================================================
// Handler
// ============================================================================

/// GET /api/reports/previsto-realizado
pub async fn previsto_realizado(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<PrevistoRealizadoResponse>> {
    let (year, month) = time::parse_month(&query.month)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}", query.month)))?;
    let (first, next) = time::month_bounds(year, month)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}", query.month)))?;

    let post_filter = match &query.service_post {
        Some(post_id) => Some(
            post_id
                .parse::<surrealdb::RecordId>()
                .map_err(|_| AppError::validation(format!("Invalid service post: {}", post_id)))?,
        ),
        None => None,
    };

    let post_clause = if post_filter.is_some() {
        " AND service_post = $post"
    } else {
        ""
    };

    tracing::debug!(
        month = %query.month,
        service_post = ?query.service_post,
        "Computing previsto×realizado report"
    );

    // quebra por posto
    let by_post_sql = format!(
        "SELECT service_post, count() AS previsto, \
           math::sum(IF status = 'present' THEN 1 ELSE 0 END) AS realizado \
         FROM allocation \
         WHERE date >= $from AND date < $to{} \
         GROUP BY service_post",
        post_clause
    );

    let mut qb = state
        .db
        .query(&by_post_sql)
        .bind(("from", first.to_string()))
        .bind(("to", next.to_string()));
    if let Some(ref post) = post_filter {
        qb = qb.bind(("post", post.clone()));
    }
    let mut result = qb
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let post_rows: Vec<PostAggRow> = result
        .take(0)
        .map_err(|e| AppError::database(e.to_string()))?;

    // série diária
    let by_date_sql = format!(
        "SELECT date, count() AS previsto, \
           math::sum(IF status = 'present' THEN 1 ELSE 0 END) AS realizado \
         FROM allocation \
         WHERE date >= $from AND date < $to{} \
         GROUP BY date ORDER BY date",
        post_clause
    );

    let mut qb = state
        .db
        .query(&by_date_sql)
        .bind(("from", first.to_string()))
        .bind(("to", next.to_string()));
    if let Some(ref post) = post_filter {
        qb = qb.bind(("post", post.clone()));
    }
    let mut result = qb
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let date_rows: Vec<DateAggRow> = result
        .take(0)
        .map_err(|e| AppError::database(e.to_string()))?;

    // nomes dos postos para a tabela do relatório
    let post_repo = ServicePostRepository::new(state.db.clone());
    let names: HashMap<String, String> = post_repo
        .find_all()
        .await?
        .into_iter()
        .filter_map(|p| p.id.as_ref().map(|id| (id.to_string(), p.name.clone())))
        .collect();

    let by_post: Vec<PostCompliance> = post_rows
        .into_iter()
        .map(|r| {
            let post_id = r.service_post.to_string();
            PostCompliance {
                post_name: names.get(&post_id).cloned().unwrap_or_default(),
                service_post: post_id,
                previsto: r.previsto,
                realizado: r.realizado,
                compliance: compliance_pct(r.previsto, r.realizado),
            }
        })
        .collect();

    // série completa: dias sem alocação entram zerados
    let dated: HashMap<String, DateAggRow> =
        date_rows.into_iter().map(|r| (r.date.clone(), r)).collect();
    let by_date: Vec<DateCompliance> = time::month_days(year, month)
        .into_iter()
        .map(|d| {
            let date = d.to_string();
            match dated.get(&date) {
                Some(r) => DateCompliance {
                    date,
                    previsto: r.previsto,
                    realizado: r.realizado,
                    compliance: compliance_pct(r.previsto, r.realizado),
                },
                None => DateCompliance {
                    date,
                    previsto: 0,
                    realizado: 0,
                    compliance: 0,
                },
            }
        })
        .collect();

    let previsto: i64 = by_post.iter().map(|p| p.previsto).sum();
    let realizado: i64 = by_post.iter().map(|p| p.realizado).sum();

    Ok(Json(PrevistoRealizadoResponse {
        month: query.month,
        service_post: query.service_post,
        summary: ComplianceSummary {
            previsto,
            realizado,
            compliance: compliance_pct(previsto, realizado),
        },
        by_post,
        by_date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_rounds() {
        assert_eq!(compliance_pct(3, 2), 67); // 66.66 → 67
        assert_eq!(compliance_pct(4, 1), 25);
        assert_eq!(compliance_pct(8, 7), 88); // 87.5 → 88
    }

    #[test]
    fn test_compliance_zero_previsto_is_zero() {
        assert_eq!(compliance_pct(0, 0), 0);
        assert_eq!(compliance_pct(0, 5), 0);
    }

    #[test]
    fn test_compliance_bounds() {
        assert_eq!(compliance_pct(10, 0), 0);
        assert_eq!(compliance_pct(10, 10), 100);
        for realizado in 0..=10 {
            let c = compliance_pct(10, realizado);
            assert!((0..=100).contains(&c));
        }
    }
}
