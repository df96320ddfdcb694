//! Repositório de postos de serviço

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ServicePost, ServicePostCreate, ServicePostUpdate};

#[derive(Clone)]
pub struct ServicePostRepository {
    base: BaseRepository,
}

impl ServicePostRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<ServicePost>> {
        let posts: Vec<ServicePost> = self
            .base
            .db()
            .query("SELECT * FROM service_post ORDER BY code")
            .await?
            .take(0)?;
        Ok(posts)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ServicePost>> {
        let rid = self.base.parse_id("service_post", id)?;
        let post: Option<ServicePost> = self.base.db().select(rid).await?;
        Ok(post)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<ServicePost>> {
        let code_owned = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM service_post WHERE code = $code LIMIT 1")
            .bind(("code", code_owned))
            .await?;
        let posts: Vec<ServicePost> = result.take(0)?;
        Ok(posts.into_iter().next())
    }

    pub async fn create(&self, data: ServicePostCreate) -> RepoResult<ServicePost> {
        if self.find_by_code(&data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Service post code '{}' already exists",
                data.code
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE service_post SET
                    code = $code,
                    name = $name,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("code", data.code))
            .bind(("name", data.name))
            .await?;

        let created: Option<ServicePost> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create service post".to_string()))
    }

    pub async fn update(&self, id: &str, data: ServicePostUpdate) -> RepoResult<ServicePost> {
        let rid = self.base.parse_id("service_post", id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service post {} not found", id)))?;

        if let Some(ref new_code) = data.code
            && new_code != &existing.code
            && self.find_by_code(new_code).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Service post code '{}' already exists",
                new_code
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    code = $code OR code,
                    name = $name OR name,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("code", data.code))
            .bind(("name", data.name))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .await?;

        result
            .take::<Option<ServicePost>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Service post {} not found", id)))
    }

    /// Remove um posto e suas atividades configuradas
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("service_post", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Service post {} not found", id)))?;

        self.base
            .db()
            .query("DELETE service_activity WHERE service_post = $rid; DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
