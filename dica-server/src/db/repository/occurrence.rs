//! Repositório de ocorrências

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Occurrence, OccurrenceCreate, OccurrenceUpdate};
use crate::utils::time;

#[derive(Clone)]
pub struct OccurrenceRepository {
    base: BaseRepository,
}

impl OccurrenceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Lista, com filtro opcional de posto
    pub async fn find_all(&self, post_id: Option<&str>) -> RepoResult<Vec<Occurrence>> {
        let rows: Vec<Occurrence> = match post_id {
            Some(post_id) => {
                let post = self.base.parse_id("service_post", post_id)?;
                self.base
                    .db()
                    .query(
                        "SELECT * FROM occurrence WHERE service_post = $post ORDER BY date DESC",
                    )
                    .bind(("post", post))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM occurrence ORDER BY date DESC")
                    .await?
                    .take(0)?
            }
        };
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Occurrence>> {
        let rid = self.base.parse_id("occurrence", id)?;
        let occurrence: Option<Occurrence> = self.base.db().select(rid).await?;
        Ok(occurrence)
    }

    pub async fn create(
        &self,
        data: OccurrenceCreate,
        reported_by: &str,
    ) -> RepoResult<Occurrence> {
        if time::parse_date(&data.date).is_none() {
            return Err(RepoError::Validation(format!("Invalid date: {}", data.date)));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE occurrence SET
                    employee = $employee,
                    service_post = $service_post,
                    date = $date,
                    kind = $kind,
                    description = $description,
                    severity = $severity,
                    reported_by = $reported_by
                RETURN AFTER"#,
            )
            .bind(("employee", data.employee))
            .bind(("service_post", data.service_post))
            .bind(("date", data.date))
            .bind(("kind", data.kind))
            .bind(("description", data.description))
            .bind(("severity", data.severity))
            .bind(("reported_by", reported_by.to_string()))
            .await?;

        let created: Option<Occurrence> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create occurrence".to_string()))
    }

    pub async fn update(&self, id: &str, data: OccurrenceUpdate) -> RepoResult<Occurrence> {
        let rid = self.base.parse_id("occurrence", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Occurrence {} not found", id)))?;

        if let Some(ref date) = data.date
            && time::parse_date(date).is_none()
        {
            return Err(RepoError::Validation(format!("Invalid date: {}", date)));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    date = $date OR date,
                    kind = $kind OR kind,
                    description = $description OR description,
                    severity = IF $has_severity THEN $severity ELSE severity END
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("date", data.date))
            .bind(("kind", data.kind))
            .bind(("description", data.description))
            .bind(("has_severity", data.severity.is_some()))
            .bind(("severity", data.severity))
            .await?;

        result
            .take::<Option<Occurrence>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Occurrence {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("occurrence", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Occurrence {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
