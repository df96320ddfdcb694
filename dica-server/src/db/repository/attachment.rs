//! Repositório de anexos

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Attachment;

#[derive(Clone)]
pub struct AttachmentRepository {
    base: BaseRepository,
}

impl AttachmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Anexos de um registro dono (execução ou documento)
    pub async fn find_by_owner(&self, owner: &RecordId) -> RepoResult<Vec<Attachment>> {
        let rows: Vec<Attachment> = self
            .base
            .db()
            .query("SELECT * FROM attachment WHERE owner = $owner ORDER BY uploaded_at")
            .bind(("owner", owner.clone()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Attachment>> {
        let rid = self.base.parse_id("attachment", id)?;
        let attachment: Option<Attachment> = self.base.db().select(rid).await?;
        Ok(attachment)
    }

    /// Procura um anexo existente com o mesmo conteúdo (deduplicação)
    pub async fn find_by_hash(&self, sha256: &str) -> RepoResult<Option<Attachment>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attachment WHERE sha256 = $sha256 LIMIT 1")
            .bind(("sha256", sha256.to_string()))
            .await?;
        let rows: Vec<Attachment> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Registra um anexo recém gravado no disco
    pub async fn create(&self, attachment: Attachment) -> RepoResult<Attachment> {
        let mut result = self
            .base
            .db()
            .query("CREATE attachment CONTENT $data RETURN AFTER")
            .bind(("data", attachment))
            .await?;
        let created: Option<Attachment> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create attachment".to_string()))
    }

    /// Remove o registro do anexo
    ///
    /// Retorna o registro removido para o chamador decidir se o arquivo
    /// no disco ainda é referenciado por outro anexo (dedup por hash).
    pub async fn delete(&self, id: &str) -> RepoResult<Attachment> {
        let rid = self.base.parse_id("attachment", id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attachment {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(existing)
    }

    /// Outros anexos ainda apontam para o mesmo arquivo?
    pub async fn hash_still_referenced(&self, sha256: &str) -> RepoResult<bool> {
        Ok(self.find_by_hash(sha256).await?.is_some())
    }
}
