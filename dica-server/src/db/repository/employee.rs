//! Repositório de funcionários

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    Employee, EmployeeCreate, EmployeeStatus, EmployeeUpdate, normalize_cpf, validate_cpf,
};
use crate::utils::time;

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Funcionários ativos
    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE status = 'active' ORDER BY name")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Todos os funcionários, inclusive inativos
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY name")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Funcionários ativos vinculados a um posto
    ///
    /// São as linhas da grade de alocação: inativos nunca aparecem.
    pub async fn find_active_by_post(&self, post_id: &str) -> RepoResult<Vec<Employee>> {
        let post = self.base.parse_id("service_post", post_id)?;
        let employees: Vec<Employee> = self
            .base
            .db()
            .query(
                "SELECT * FROM employee WHERE status = 'active' AND service_post = $post ORDER BY name",
            )
            .bind(("post", post))
            .await?
            .take(0)?;
        Ok(employees)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Employee>> {
        let rid = self.base.parse_id("employee", id)?;
        let emp: Option<Employee> = self.base.db().select(rid).await?;
        Ok(emp)
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<Employee>> {
        let cpf_owned = cpf.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE cpf = $cpf LIMIT 1")
            .bind(("cpf", cpf_owned))
            .await?;
        let employees: Vec<Employee> = result.take(0)?;
        Ok(employees.into_iter().next())
    }

    /// Cria um funcionário
    pub async fn create(&self, data: EmployeeCreate) -> RepoResult<Employee> {
        let cpf = normalize_cpf(&data.cpf);
        if !validate_cpf(&cpf) {
            return Err(RepoError::Validation(format!("Invalid CPF: {}", data.cpf)));
        }
        if time::parse_date(&data.admission_date).is_none() {
            return Err(RepoError::Validation(format!(
                "Invalid admission date: {}",
                data.admission_date
            )));
        }
        if self.find_by_cpf(&cpf).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "CPF '{}' already registered",
                cpf
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE employee SET
                    name = $name,
                    cpf = $cpf,
                    funcao = $funcao,
                    unit = $unit,
                    status = 'active',
                    service_post = $service_post,
                    admission_date = $admission_date
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("cpf", cpf))
            .bind(("funcao", data.funcao))
            .bind(("unit", data.unit))
            .bind(("service_post", data.service_post))
            .bind(("admission_date", data.admission_date))
            .await?;

        let created: Option<Employee> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
    }

    /// Altera um funcionário (CPF é imutável)
    pub async fn update(&self, id: &str, data: EmployeeUpdate) -> RepoResult<Employee> {
        let rid = self.base.parse_id("employee", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        if let Some(ref admission) = data.admission_date
            && time::parse_date(admission).is_none()
        {
            return Err(RepoError::Validation(format!(
                "Invalid admission date: {}",
                admission
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $rid SET
                    name = $name OR name,
                    funcao = $funcao OR funcao,
                    unit = $unit OR unit,
                    status = IF $has_status THEN $status ELSE status END,
                    service_post = IF $has_post THEN $service_post ELSE service_post END,
                    admission_date = $admission_date OR admission_date
                RETURN AFTER"#,
            )
            .bind(("rid", rid))
            .bind(("name", data.name))
            .bind(("funcao", data.funcao))
            .bind(("unit", data.unit))
            .bind(("has_status", data.status.is_some()))
            .bind(("status", data.status))
            .bind(("has_post", data.service_post.is_some()))
            .bind(("service_post", data.service_post))
            .bind(("admission_date", data.admission_date))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Remove um funcionário
    ///
    /// Com alocações registradas o histórico precisa sobreviver, então
    /// a remoção vira desativação. Sem alocações, remoção física.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("employee", id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        #[derive(serde::Deserialize)]
        struct CountResult {
            total: u64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM allocation WHERE employee = $rid GROUP ALL")
            .bind(("rid", rid.clone()))
            .await?;
        let counts: Vec<CountResult> = result.take(0)?;
        let has_allocations = counts.first().map(|c| c.total > 0).unwrap_or(false);

        if has_allocations {
            self.base
                .db()
                .query("UPDATE $rid SET status = 'inactive'")
                .bind(("rid", rid))
                .await?;
        } else {
            self.base
                .db()
                .query("DELETE $rid")
                .bind(("rid", rid))
                .await?;
        }
        Ok(true)
    }

    /// Marca como inativo sem remover
    pub async fn deactivate(&self, id: &str) -> RepoResult<Employee> {
        self.update(
            id,
            EmployeeUpdate {
                name: None,
                funcao: None,
                unit: None,
                status: Some(EmployeeStatus::Inactive),
                service_post: None,
                admission_date: None,
            },
        )
        .await
    }
}
