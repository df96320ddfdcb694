//! Repositório de alocações diárias
//!
//! As escritas em lote (salvar grade, copiar competência) rodam em uma
//! única transação SurrealQL: ou todas as células entram, ou nenhuma.

use std::collections::HashSet;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Allocation, AllocationBatch, CopyMonthRequest, CopyMonthResult};
use crate::utils::time;

#[derive(Clone)]
pub struct AllocationRepository {
    base: BaseRepository,
}

impl AllocationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Alocações de um intervalo de datas, com filtro opcional de posto
    pub async fn find_range(
        &self,
        post_id: Option<&str>,
        from: &str,
        to: &str,
    ) -> RepoResult<Vec<Allocation>> {
        if time::parse_date(from).is_none() || time::parse_date(to).is_none() {
            return Err(RepoError::Validation(format!(
                "Invalid date range: {} .. {}",
                from, to
            )));
        }

        let rows: Vec<Allocation> = match post_id {
            Some(post_id) => {
                let post = self.base.parse_id("service_post", post_id)?;
                self.base
                    .db()
                    .query(
                        "SELECT * FROM allocation \
                         WHERE service_post = $post AND date >= $from AND date <= $to \
                         ORDER BY date",
                    )
                    .bind(("post", post))
                    .bind(("from", from.to_string()))
                    .bind(("to", to.to_string()))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM allocation \
                         WHERE date >= $from AND date <= $to \
                         ORDER BY date",
                    )
                    .bind(("from", from.to_string()))
                    .bind(("to", to.to_string()))
                    .await?
                    .take(0)?
            }
        };
        Ok(rows)
    }

    /// Alocações de um posto em uma competência
    pub async fn find_month(
        &self,
        post_id: &str,
        year: i32,
        month: u32,
    ) -> RepoResult<Vec<Allocation>> {
        let post = self.base.parse_id("service_post", post_id)?;
        let (first, next) = time::month_bounds(year, month)
            .ok_or_else(|| RepoError::Validation(format!("Invalid month: {year}-{month:02}")))?;

        let rows: Vec<Allocation> = self
            .base
            .db()
            .query(
                "SELECT * FROM allocation \
                 WHERE service_post = $post AND date >= $from AND date < $to \
                 ORDER BY date",
            )
            .bind(("post", post))
            .bind(("from", first.to_string()))
            .bind(("to", next.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Confere se todos os funcionários referenciados existem
    async fn check_employees_exist(&self, ids: &[RecordId]) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE id FROM employee WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        let found: Vec<RecordId> = result.take(0)?;
        let found: HashSet<String> = found.into_iter().map(|id| id.to_string()).collect();

        if let Some(missing) = ids.iter().find(|id| !found.contains(&id.to_string())) {
            return Err(RepoError::Validation(format!(
                "Unknown employee: {}",
                missing
            )));
        }
        Ok(())
    }

    /// Aplica um lote de edições da grade em uma transação
    ///
    /// Cada entrada faz upsert sobre (employee, service_post, date).
    /// Qualquer entrada inválida aborta o lote inteiro antes de
    /// qualquer escrita.
    pub async fn batch_save(&self, batch: AllocationBatch) -> RepoResult<usize> {
        if batch.entries.is_empty() {
            return Ok(0);
        }

        // validação completa antes de tocar o banco
        let mut seen = HashSet::new();
        let mut employees = Vec::new();
        for entry in &batch.entries {
            if time::parse_date(&entry.date).is_none() {
                return Err(RepoError::Validation(format!(
                    "Invalid date: {}",
                    entry.date
                )));
            }
            if entry.employee.table() != "employee" {
                return Err(RepoError::Validation(format!(
                    "Expected employee ID, got: {}",
                    entry.employee
                )));
            }
            if seen.insert(entry.employee.to_string()) {
                employees.push(entry.employee.clone());
            }
        }
        self.check_employees_exist(&employees).await?;

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..batch.entries.len() {
            sql.push_str(&format!(
                "UPSERT allocation SET \
                   employee = $emp{i}, service_post = $post, date = $date{i}, \
                   status = $status{i}, notes = $notes{i} \
                 WHERE employee = $emp{i} AND service_post = $post AND date = $date{i};\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut qb = self
            .base
            .db()
            .query(sql)
            .bind(("post", batch.service_post.clone()));
        for (i, entry) in batch.entries.iter().enumerate() {
            qb = qb
                .bind((format!("emp{i}"), entry.employee.clone()))
                .bind((format!("date{i}"), entry.date.clone()))
                .bind((format!("status{i}"), entry.status))
                .bind((format!("notes{i}"), entry.notes.clone()));
        }
        qb.await?;

        Ok(batch.entries.len())
    }

    /// Copia as alocações da competência anterior para a competência alvo
    ///
    /// As linhas existentes da competência alvo são substituídas; a
    /// remoção e as criações rodam na mesma transação. Linhas da origem
    /// cujo dia não existe no mês alvo (29..31) são descartadas e
    /// contabilizadas em `dropped`.
    pub async fn copy_month(&self, req: CopyMonthRequest) -> RepoResult<CopyMonthResult> {
        if req.service_post.table() != "service_post" {
            return Err(RepoError::Validation(format!(
                "Expected service_post ID, got: {}",
                req.service_post
            )));
        }
        let (ty, tm) = time::parse_month(&req.target_month).ok_or_else(|| {
            RepoError::Validation(format!("Invalid target month: {}", req.target_month))
        })?;
        let (sy, sm) = time::previous_month(ty, tm);

        let (s_first, s_next) = time::month_bounds(sy, sm)
            .ok_or_else(|| RepoError::Validation("Invalid source month".to_string()))?;
        let (t_first, t_next) = time::month_bounds(ty, tm)
            .ok_or_else(|| RepoError::Validation("Invalid target month".to_string()))?;

        let source: Vec<Allocation> = self
            .base
            .db()
            .query(
                "SELECT * FROM allocation \
                 WHERE service_post = $post AND date >= $from AND date < $to",
            )
            .bind(("post", req.service_post.clone()))
            .bind(("from", s_first.to_string()))
            .bind(("to", s_next.to_string()))
            .await?
            .take(0)?;

        // espelha as datas no mês alvo
        let mut rows = Vec::with_capacity(source.len());
        let mut dropped = 0usize;
        for alloc in source {
            let Some(date) = time::parse_date(&alloc.date) else {
                dropped += 1;
                continue;
            };
            use chrono::Datelike;
            match chrono::NaiveDate::from_ymd_opt(ty, tm, date.day()) {
                Some(target_date) => rows.push((alloc, target_date.to_string())),
                None => dropped += 1,
            }
        }

        let mut sql = String::from(
            "BEGIN TRANSACTION;\n\
             DELETE allocation WHERE service_post = $post AND date >= $tfrom AND date < $tto;\n",
        );
        for i in 0..rows.len() {
            sql.push_str(&format!(
                "CREATE allocation SET \
                   employee = $emp{i}, service_post = $post, date = $date{i}, \
                   status = $status{i}, notes = $notes{i};\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut qb = self
            .base
            .db()
            .query(sql)
            .bind(("post", req.service_post.clone()))
            .bind(("tfrom", t_first.to_string()))
            .bind(("tto", t_next.to_string()));
        for (i, (alloc, target_date)) in rows.iter().enumerate() {
            qb = qb
                .bind((format!("emp{i}"), alloc.employee.clone()))
                .bind((format!("date{i}"), target_date.clone()))
                .bind((format!("status{i}"), alloc.status))
                .bind((format!("notes{i}"), alloc.notes.clone()));
        }
        qb.await?;

        Ok(CopyMonthResult {
            copied: rows.len(),
            dropped,
        })
    }

    /// Remove uma alocação
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = self.base.parse_id("allocation", id)?;
        let existing: Option<Allocation> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Allocation {} not found", id)));
        }
        self.base
            .db()
            .query("DELETE $rid")
            .bind(("rid", rid))
            .await?;
        Ok(true)
    }
}
