//! Repositório de férias e licenças

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{FeriasLicencas, FeriasLicencasCreate, FeriasLicencasUpdate, LeaveStatus};
use crate::utils::time;

/// Filtros de listagem
#[derive(Debug, Default)]
pub struct LeaveFilter {
    pub employee: Option<String>,
    pub status: Option<LeaveStatus>,
    /// Período `(from, to)` — retorna registros que intersectam
    pub period: Option<(String, String)>,
}

#[derive(Clone)]
pub struct FeriasLicencasRepository {
    base: BaseRepository,
}

impl FeriasLicencasRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Lista com filtros opcionais
    pub async fn find(&self, filter: LeaveFilter) -> RepoResult<Vec<FeriasLicencas>> {
        let mut conditions = Vec::new();
        if filter.employee.is_some() {
            conditions.push("employee = $employee");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.period.is_some() {
            // intersecção de intervalos fechados
            conditions.push("start_date <= $to AND end_date >= $from");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM ferias_licencas{} ORDER BY start_date DESC",
            where_clause
        );

        let mut qb = self.base.db().query(sql);
        if let Some(ref employee) = filter.employee {
            let rid = self.base.parse_id("employee", employee)?;
            qb = qb.bind(("employee", rid));
        }
        if let Some(status) = filter.status {
            qb = qb.bind(("status", status));
        }
        if let Some((from, to)) = filter.period {
            if time::parse_date(&from).is_none() || time::parse_date(&to).is_none() {
                return Err(RepoError::Validation(format!(
                    "Invalid period: {} .. {}",
                    from, to
                )));
            }
            qb = qb.bind(("from", from)).bind(("to", to));
        }

        let rows: Vec<FeriasLicencas> = qb.await?.take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<FeriasLicencas>> {
        let rid = self.base.parse_id("ferias_licencas", id)?;
        let record: Option<FeriasLicencas> = self.base.db().select(rid).await?;
        Ok(record)
    }

    /// Valida o intervalo de datas do registro
    fn check_dates(start: &str, end: &str) -> RepoResult<()> {
        let start_date = time::parse_date(start)
            .ok_or_else(|| RepoError::Validation(format!("Invalid start date: {}", start)))?;
        let end_date = time::parse_date(end)
            .ok_or_else(|| RepoError::Validation(format!("Invalid end date: {}", end)))?;
        if start_date > end_date {
            return Err(RepoError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
        Ok(())
    }

    /// Cria um registro de afastamento
    pub async fn create(&self, data: FeriasLicencasCreate) -> RepoResult<FeriasLicencas> {
        Self::check_dates(&data.start_date, &data.end_date)?;
        if data.employee.table() != "employee" {
            return Err(RepoError::Validation(format!(
                "Expected employee ID, got: {}",
                data.employee
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE ferias_licencas SET
                    employee = $employee,
                    kind = $kind,
                    start_date = $start_date,
                    end_date = $end_date,
                    status = $status,
                    observations = $observations
                RETURN AFTER"#,
            )
            .bind(("employee", data.employee))
            .bind(("kind", data.kind))
            .bind(("start_date", data.start_date))
            .bind(("end_date", data.end_date))
            .bind(("status", data.status))
            .bind(("observations", data.observations))
            .await?;

        let created: Option<FeriasLicencas> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave record".to_string()))
    }

    /// Altera um registro
    ///
    /// O invariante start ≤ end é conferido sobre o estado resultante,
    /// mesmo quando só uma das pontas muda.
    pub async fn update(&self, id: &str, data: FeriasLicencasUpdate) -> RepoResult<FeriasLicencas> {
        let rid = self.base.parse_id("ferias_licencas", id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave record {} not found", id)))?;

        let start = data.start_date.as_deref().unwrap_or(&existing.start_date);
        let end = data.end_date.as_deref().unwrap_or(&existing.end_date);
        Self::check_dates(start, end)?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    kind = IF $has_kind THEN $kind ELSE kind END,
                    start_date = $start_date OR start_date,
                    end_date = $end_date OR end_date,
                    status = IF $has_status THEN $status ELSE status END,
                    observations = IF $has_obs THEN $observations ELSE observations END
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("has_kind", data.kind.is_some()))
            .bind(("kind", data.kind))
            .bind(("start_date", data.start_date))
            .bind(("end_date", data.end_date))
            .bind(("has_status", data.status.is_some()))
            .bind(("status", data.status))
            .bind(("has_obs", data.observations.is_some()))
            .bind(("observations", data.observations))
            .await?;

        result
            .take::<Option<FeriasLicencas>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Leave record {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("ferias_licencas", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave record {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
