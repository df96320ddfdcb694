//! Repositório de atividades recorrentes

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ServiceActivity, ServiceActivityCreate, ServiceActivityUpdate};

#[derive(Clone)]
pub struct ServiceActivityRepository {
    base: BaseRepository,
}

impl ServiceActivityRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atividades configuradas de um posto
    pub async fn find_by_post(&self, post_id: &str) -> RepoResult<Vec<ServiceActivity>> {
        let post = self.base.parse_id("service_post", post_id)?;
        let activities: Vec<ServiceActivity> = self
            .base
            .db()
            .query("SELECT * FROM service_activity WHERE service_post = $post ORDER BY name")
            .bind(("post", post))
            .await?
            .take(0)?;
        Ok(activities)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ServiceActivity>> {
        let rid = self.base.parse_id("service_activity", id)?;
        let activity: Option<ServiceActivity> = self.base.db().select(rid).await?;
        Ok(activity)
    }

    /// Cria uma atividade em um posto
    pub async fn create(
        &self,
        post_id: &str,
        data: ServiceActivityCreate,
    ) -> RepoResult<ServiceActivity> {
        let post = self.base.parse_id("service_post", post_id)?;

        // posto precisa existir
        let exists: Option<serde_json::Value> = self.base.db().select(post.clone()).await?;
        if exists.is_none() {
            return Err(RepoError::NotFound(format!(
                "Service post {} not found",
                post_id
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE service_activity SET
                    service_post = $post,
                    name = $name,
                    frequency = $frequency,
                    unit = $unit,
                    expected_quantity = $expected_quantity
                RETURN AFTER"#,
            )
            .bind(("post", post))
            .bind(("name", data.name))
            .bind(("frequency", data.frequency))
            .bind(("unit", data.unit))
            .bind(("expected_quantity", data.expected_quantity))
            .await?;

        let created: Option<ServiceActivity> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create service activity".to_string()))
    }

    pub async fn update(
        &self,
        id: &str,
        data: ServiceActivityUpdate,
    ) -> RepoResult<ServiceActivity> {
        let rid = self.base.parse_id("service_activity", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service activity {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    name = $name OR name,
                    frequency = IF $has_frequency THEN $frequency ELSE frequency END,
                    unit = $unit OR unit,
                    expected_quantity = IF $has_expected THEN $expected_quantity ELSE expected_quantity END
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("name", data.name))
            .bind(("has_frequency", data.frequency.is_some()))
            .bind(("frequency", data.frequency))
            .bind(("unit", data.unit))
            .bind(("has_expected", data.expected_quantity.is_some()))
            .bind(("expected_quantity", data.expected_quantity))
            .await?;

        result
            .take::<Option<ServiceActivity>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Service activity {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("service_activity", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service activity {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
