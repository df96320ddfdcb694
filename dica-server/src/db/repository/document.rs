//! Repositório de documentos

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Document, DocumentCreate, DocumentUpdate};
use crate::utils::time;

#[derive(Clone)]
pub struct DocumentRepository {
    base: BaseRepository,
}

impl DocumentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Lista, com filtro opcional de funcionário
    pub async fn find_all(&self, employee_id: Option<&str>) -> RepoResult<Vec<Document>> {
        let rows: Vec<Document> = match employee_id {
            Some(employee_id) => {
                let employee = self.base.parse_id("employee", employee_id)?;
                self.base
                    .db()
                    .query("SELECT * FROM document WHERE employee = $employee ORDER BY title")
                    .bind(("employee", employee))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM document ORDER BY title")
                    .await?
                    .take(0)?
            }
        };
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Document>> {
        let rid = self.base.parse_id("document", id)?;
        let document: Option<Document> = self.base.db().select(rid).await?;
        Ok(document)
    }

    fn check_dates(data_issued: Option<&str>, data_expiry: Option<&str>) -> RepoResult<()> {
        for date in [data_issued, data_expiry].into_iter().flatten() {
            if time::parse_date(date).is_none() {
                return Err(RepoError::Validation(format!("Invalid date: {}", date)));
            }
        }
        Ok(())
    }

    pub async fn create(&self, data: DocumentCreate) -> RepoResult<Document> {
        Self::check_dates(data.issued_date.as_deref(), data.expiry_date.as_deref())?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE document SET
                    title = $title,
                    category = $category,
                    employee = $employee,
                    issued_date = $issued_date,
                    expiry_date = $expiry_date,
                    notes = $notes
                RETURN AFTER"#,
            )
            .bind(("title", data.title))
            .bind(("category", data.category))
            .bind(("employee", data.employee))
            .bind(("issued_date", data.issued_date))
            .bind(("expiry_date", data.expiry_date))
            .bind(("notes", data.notes))
            .await?;

        let created: Option<Document> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create document".to_string()))
    }

    pub async fn update(&self, id: &str, data: DocumentUpdate) -> RepoResult<Document> {
        let rid = self.base.parse_id("document", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Document {} not found", id)))?;

        Self::check_dates(data.issued_date.as_deref(), data.expiry_date.as_deref())?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    title = $title OR title,
                    category = $category OR category,
                    issued_date = $issued_date OR issued_date,
                    expiry_date = $expiry_date OR expiry_date,
                    notes = $notes OR notes
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("title", data.title))
            .bind(("category", data.category))
            .bind(("issued_date", data.issued_date))
            .bind(("expiry_date", data.expiry_date))
            .bind(("notes", data.notes))
            .await?;

        result
            .take::<Option<Document>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Document {} not found", id)))
    }

    /// Remove o documento e os anexos vinculados
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("document", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Document {} not found", id)))?;

        self.base
            .db()
            .query("DELETE attachment WHERE owner = $rid; DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
