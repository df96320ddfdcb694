//! Repositório de execuções de atividade

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ActivityExecution, ActivityExecutionCreate, ActivityExecutionUpdate};
use crate::utils::time;

#[derive(Clone)]
pub struct ActivityExecutionRepository {
    base: BaseRepository,
}

impl ActivityExecutionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Execuções de um posto em um intervalo de datas
    pub async fn find_by_post_range(
        &self,
        post_id: &str,
        from: &str,
        to: &str,
    ) -> RepoResult<Vec<ActivityExecution>> {
        let post = self.base.parse_id("service_post", post_id)?;
        if time::parse_date(from).is_none() || time::parse_date(to).is_none() {
            return Err(RepoError::Validation(format!(
                "Invalid date range: {} .. {}",
                from, to
            )));
        }

        let rows: Vec<ActivityExecution> = self
            .base
            .db()
            .query(
                "SELECT * FROM activity_execution \
                 WHERE service_post = $post AND date >= $from AND date <= $to \
                 ORDER BY date",
            )
            .bind(("post", post))
            .bind(("from", from.to_string()))
            .bind(("to", to.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ActivityExecution>> {
        let rid = self.base.parse_id("activity_execution", id)?;
        let execution: Option<ActivityExecution> = self.base.db().select(rid).await?;
        Ok(execution)
    }

    /// Existe lançamento para (atividade, data)?
    pub async fn find_by_activity_date(
        &self,
        activity: &surrealdb::RecordId,
        date: &str,
    ) -> RepoResult<Option<ActivityExecution>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM activity_execution \
                 WHERE service_activity = $activity AND date = $date LIMIT 1",
            )
            .bind(("activity", activity.clone()))
            .bind(("date", date.to_string()))
            .await?;
        let rows: Vec<ActivityExecution> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Registra uma execução
    pub async fn create(&self, data: ActivityExecutionCreate) -> RepoResult<ActivityExecution> {
        if time::parse_date(&data.date).is_none() {
            return Err(RepoError::Validation(format!("Invalid date: {}", data.date)));
        }
        if data.quantity < 0 {
            return Err(RepoError::Validation(
                "Quantity must be a non-negative integer".to_string(),
            ));
        }
        if data.service_activity.table() != "service_activity" {
            return Err(RepoError::Validation(format!(
                "Expected service_activity ID, got: {}",
                data.service_activity
            )));
        }

        // resolve o posto pela atividade
        #[derive(serde::Deserialize)]
        struct PostOnly {
            service_post: surrealdb::RecordId,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT service_post FROM $activity")
            .bind(("activity", data.service_activity.clone()))
            .await?;
        let post = result
            .take::<Vec<PostOnly>>(0)?
            .into_iter()
            .next()
            .map(|p| p.service_post)
            .ok_or_else(|| {
                RepoError::NotFound(format!(
                    "Service activity {} not found",
                    data.service_activity
                ))
            })?;

        if self
            .find_by_activity_date(&data.service_activity, &data.date)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Execution already recorded for {} on {}",
                data.service_activity, data.date
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE activity_execution SET
                    service_activity = $activity,
                    service_post = $post,
                    date = $date,
                    quantity = $quantity,
                    employee = $employee,
                    notes = $notes
                RETURN AFTER"#,
            )
            .bind(("activity", data.service_activity))
            .bind(("post", post))
            .bind(("date", data.date))
            .bind(("quantity", data.quantity))
            .bind(("employee", data.employee))
            .bind(("notes", data.notes))
            .await?;

        let created: Option<ActivityExecution> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create execution".to_string()))
    }

    /// Altera uma execução
    pub async fn update(
        &self,
        id: &str,
        data: ActivityExecutionUpdate,
    ) -> RepoResult<ActivityExecution> {
        let rid = self.base.parse_id("activity_execution", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Execution {} not found", id)))?;

        if let Some(q) = data.quantity
            && q < 0
        {
            return Err(RepoError::Validation(
                "Quantity must be a non-negative integer".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    quantity = IF $has_quantity THEN $quantity ELSE quantity END,
                    employee = IF $has_employee THEN $employee ELSE employee END,
                    notes = IF $has_notes THEN $notes ELSE notes END
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("has_quantity", data.quantity.is_some()))
            .bind(("quantity", data.quantity))
            .bind(("has_employee", data.employee.is_some()))
            .bind(("employee", data.employee))
            .bind(("has_notes", data.notes.is_some()))
            .bind(("notes", data.notes))
            .await?;

        result
            .take::<Option<ActivityExecution>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Execution {} not found", id)))
    }

    /// Remove uma execução (os anexos saem junto)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("activity_execution", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Execution {} not found", id)))?;

        self.base
            .db()
            .query("DELETE attachment WHERE owner = $rid; DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
