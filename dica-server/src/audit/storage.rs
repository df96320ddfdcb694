//! Armazenamento do log de auditoria (SurrealDB)
//!
//! Desenho append-only: não existe interface de alteração ou remoção.
//! A cadeia de hashes SHA256 garante detecção de adulteração.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{
    AuditAction, AuditChainBreak, AuditChainVerification, AuditEntry, AuditQuery,
};

/// Erros da camada de armazenamento
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for AuditStorageError {
    fn from(err: surrealdb::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for crate::utils::AppError {
    fn from(err: AuditStorageError) -> Self {
        crate::utils::AppError::internal(err.to_string())
    }
}

/// Registro como sai do SurrealDB (com record id)
#[derive(Debug, Clone, serde::Deserialize)]
struct AuditRecord {
    #[allow(dead_code)]
    id: surrealdb::RecordId,
    sequence: u64,
    timestamp: i64,
    action: AuditAction,
    entity_type: String,
    entity_id: String,
    operator_id: Option<String>,
    operator_name: Option<String>,
    details: serde_json::Value,
    prev_hash: String,
    curr_hash: String,
}

impl From<AuditRecord> for AuditEntry {
    fn from(r: AuditRecord) -> Self {
        AuditEntry {
            id: r.sequence,
            timestamp: r.timestamp,
            action: r.action,
            entity_type: r.entity_type,
            entity_id: r.entity_id,
            operator_id: r.operator_id,
            operator_name: r.operator_name,
            details: r.details,
            prev_hash: r.prev_hash,
            curr_hash: r.curr_hash,
        }
    }
}

/// Sequência e hash do último registro
#[derive(Debug, serde::Deserialize)]
struct LastEntry {
    sequence: u64,
    curr_hash: String,
}

/// Resultado de COUNT
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// Estrutura de inserção (sem record id)
#[derive(Debug, serde::Serialize)]
struct AuditInsert {
    sequence: u64,
    timestamp: i64,
    action: AuditAction,
    entity_type: String,
    entity_id: String,
    operator_id: Option<String>,
    operator_name: Option<String>,
    details: serde_json::Value,
    prev_hash: String,
    curr_hash: String,
}

/// Armazenamento do log (SurrealDB)
///
/// - apenas `append` e consultas
/// - a cadeia SHA256 liga cada registro ao anterior
#[derive(Clone)]
pub struct AuditStorage {
    db: Surreal<Db>,
    /// Serializa os appends; evita corrida de read-modify-write na sequência
    append_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AuditStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            db,
            append_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Acrescenta um registro
    ///
    /// 1. lê a maior sequência e o último hash
    /// 2. calcula o hash do novo registro
    /// 3. grava
    pub async fn append(
        &self,
        action: AuditAction,
        entity_type: String,
        entity_id: String,
        operator_id: Option<String>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) -> AuditStorageResult<AuditEntry> {
        let _guard = self.append_lock.lock().await;

        // 1. última sequência e hash
        let mut result = self
            .db
            .query("SELECT sequence, curr_hash FROM audit_log ORDER BY sequence DESC LIMIT 1")
            .await?;
        let last: Vec<LastEntry> = result.take(0)?;

        let (sequence, prev_hash) = match last.first() {
            Some(last) => (last.sequence + 1, last.curr_hash.clone()),
            None => (1, "genesis".to_string()),
        };

        // 2. hash (todos os campos persistidos participam)
        let timestamp = shared::util::now_millis();
        let curr_hash = compute_audit_hash(
            &prev_hash,
            sequence,
            timestamp,
            &action,
            &entity_type,
            &entity_id,
            operator_id.as_deref(),
            operator_name.as_deref(),
            &details,
        );

        // 3. valor de retorno antes, inserção depois (consome os campos)
        let entry = AuditEntry {
            id: sequence,
            timestamp,
            action,
            entity_type: entity_type.clone(),
            entity_id: entity_id.clone(),
            operator_id: operator_id.clone(),
            operator_name: operator_name.clone(),
            details: details.clone(),
            prev_hash: prev_hash.clone(),
            curr_hash: curr_hash.clone(),
        };

        let insert = AuditInsert {
            sequence,
            timestamp,
            action,
            entity_type,
            entity_id,
            operator_id,
            operator_name,
            details,
            prev_hash,
            curr_hash,
        };

        let mut res = self
            .db
            .query("CREATE audit_log CONTENT $data")
            .bind(("data", insert))
            .await?;
        let _: Vec<AuditRecord> = res.take(0)?;

        Ok(entry)
    }

    /// Monta a cláusula WHERE de uma consulta filtrada
    fn build_where(q: &AuditQuery) -> String {
        let mut conditions: Vec<&'static str> = Vec::new();

        if q.from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if q.to.is_some() {
            conditions.push("timestamp <= $to");
        }
        if q.action.is_some() {
            conditions.push("action = $action");
        }
        if q.operator_id.is_some() {
            conditions.push("operator_id = $operator_id");
        }
        if q.entity_type.is_some() {
            conditions.push("entity_type = $entity_type");
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    /// Consulta paginada com filtros
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<(Vec<AuditEntry>, u64)> {
        let where_clause = Self::build_where(q);

        let count_sql = format!(
            "SELECT count() as total FROM audit_log{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM audit_log{} ORDER BY sequence DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.db.query(&sql);
        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(ref action) = q.action {
            let action_str = serde_json::to_value(action)?
                .as_str()
                .unwrap_or_default()
                .to_string();
            qb = qb.bind(("action", action_str));
        }
        if let Some(ref operator_id) = q.operator_id {
            qb = qb.bind(("operator_id", operator_id.clone()));
        }
        if let Some(ref entity_type) = q.entity_type {
            qb = qb.bind(("entity_type", entity_type.clone()));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<AuditRecord> = result.take(1)?;
        let entries = records.into_iter().map(AuditEntry::from).collect();

        Ok((entries, total))
    }

    /// Todos os registros que casam com o filtro, em ordem de sequência
    ///
    /// Usado pela exportação CSV (sem paginação).
    pub async fn query_all(&self, q: &AuditQuery) -> AuditStorageResult<Vec<AuditEntry>> {
        let where_clause = Self::build_where(q);
        let sql = format!(
            "SELECT * FROM audit_log{} ORDER BY sequence ASC",
            where_clause
        );

        let mut qb = self.db.query(&sql);
        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(ref action) = q.action {
            let action_str = serde_json::to_value(action)?
                .as_str()
                .unwrap_or_default()
                .to_string();
            qb = qb.bind(("action", action_str));
        }
        if let Some(ref operator_id) = q.operator_id {
            qb = qb.bind(("operator_id", operator_id.clone()));
        }
        if let Some(ref entity_type) = q.entity_type {
            qb = qb.bind(("entity_type", entity_type.clone()));
        }

        let mut result = qb.await?;
        let records: Vec<AuditRecord> = result.take(0)?;
        Ok(records.into_iter().map(AuditEntry::from).collect())
    }

    /// Últimos N registros (decrescente)
    pub async fn query_last(&self, count: usize) -> AuditStorageResult<(Vec<AuditEntry>, u64)> {
        let sql = format!(
            "SELECT count() as total FROM audit_log GROUP ALL; \
             SELECT * FROM audit_log ORDER BY sequence DESC LIMIT {}",
            count
        );
        let mut result = self.db.query(&sql).await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<AuditRecord> = result.take(1)?;
        let entries = records.into_iter().map(AuditEntry::from).collect();

        Ok((entries, total))
    }

    /// Tipos de entidade distintos presentes no log
    pub async fn distinct_entity_types(&self) -> AuditStorageResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct TypeRow {
            entity_type: String,
        }
        let mut result = self
            .db
            .query("SELECT entity_type FROM audit_log GROUP BY entity_type ORDER BY entity_type")
            .await?;
        let rows: Vec<TypeRow> = result.take(0)?;
        Ok(rows.into_iter().map(|r| r.entity_type).collect())
    }

    /// Verifica a integridade da cadeia em um intervalo de tempo
    ///
    /// Recalcula o hash de cada registro e confere o encadeamento com o
    /// anterior. Qualquer alteração de campo quebra a verificação.
    pub async fn verify_chain(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> AuditStorageResult<AuditChainVerification> {
        let mut conditions = Vec::new();
        if from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if to.is_some() {
            conditions.push("timestamp <= $to");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM audit_log{} ORDER BY sequence ASC",
            where_clause
        );

        let mut qb = self.db.query(&sql);
        if let Some(from) = from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = to {
            qb = qb.bind(("to", to));
        }
        let mut result = qb.await?;
        let records: Vec<AuditRecord> = result.take(0)?;

        let mut breaks = Vec::new();
        let mut prev: Option<&AuditRecord> = None;

        for record in &records {
            // encadeamento com o registro anterior do intervalo
            if let Some(prev) = prev
                && record.prev_hash != prev.curr_hash
            {
                breaks.push(AuditChainBreak {
                    entry_id: record.sequence,
                    expected_hash: prev.curr_hash.clone(),
                    actual_hash: record.prev_hash.clone(),
                });
            }

            // o hash do próprio registro precisa bater com os campos
            let recomputed = compute_audit_hash(
                &record.prev_hash,
                record.sequence,
                record.timestamp,
                &record.action,
                &record.entity_type,
                &record.entity_id,
                record.operator_id.as_deref(),
                record.operator_name.as_deref(),
                &record.details,
            );
            if recomputed != record.curr_hash {
                breaks.push(AuditChainBreak {
                    entry_id: record.sequence,
                    expected_hash: recomputed,
                    actual_hash: record.curr_hash.clone(),
                });
            }

            prev = Some(record);
        }

        Ok(AuditChainVerification {
            total_entries: records.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        })
    }
}

/// Normaliza um JSON — inteiros degradados a float voltam a i64
///
/// O SurrealDB armazena números como float; `5` lido de volta vira
/// `5.0`. A normalização garante que o hash calculado na escrita e na
/// releitura coincida.
///
/// Faixa segura: mantissa de 52 bits, apenas |v| ≤ 2^53 converte sem perda.
fn normalize_json(value: &serde_json::Value) -> serde_json::Value {
    /// Maior inteiro representável exatamente em f64 (2^53)
    const MAX_SAFE_INT: f64 = (1_i64 << 53) as f64;

    match value {
        serde_json::Value::Number(n) => {
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f.abs() <= MAX_SAFE_INT
            {
                return serde_json::Value::Number(serde_json::Number::from(f as i64));
            }
            value.clone()
        }
        serde_json::Value::Object(map) => {
            let normalized: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            serde_json::Value::Object(normalized)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(normalize_json).collect())
        }
        _ => value.clone(),
    }
}

/// Calcula o hash SHA256 de um registro
///
/// Todos os campos persistidos participam; qualquer alteração invalida
/// o hash.
///
/// - campos variáveis separados por `\x00` — evita colisão entre
///   `("ab","cd")` e `("abc","d")`
/// - campos de tamanho fixo (u64/i64) em bytes LE, sem separador
/// - opcionais com tag `\x00`=None / `\x01`+bytes=Some — distingue
///   None de Some("")
/// - action serializada via serde (snake_case, estável entre versões)
/// - details normalizado para anular drift numérico do SurrealDB
#[allow(clippy::too_many_arguments)]
fn compute_audit_hash(
    prev_hash: &str,
    id: u64,
    timestamp: i64,
    action: &AuditAction,
    entity_type: &str,
    entity_id: &str,
    operator_id: Option<&str>,
    operator_name: Option<&str>,
    details: &serde_json::Value,
) -> String {
    let mut hasher = Sha256::new();

    // encadeia o hash anterior
    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    // campos de tamanho fixo
    hasher.update(id.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());

    // action — serde snake_case (mesmo formato do banco)
    let action_str = serde_json::to_string(action).unwrap_or_default();
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    // strings variáveis com separador
    hasher.update(entity_type.as_bytes());
    hasher.update(b"\x00");
    hasher.update(entity_id.as_bytes());
    hasher.update(b"\x00");

    // opcionais com tag byte
    hash_optional(&mut hasher, operator_id);
    hash_optional(&mut hasher, operator_name);

    // details (normalizado)
    let normalized = normalize_json(details);
    let details_json = serde_json::to_string(&normalized).unwrap_or_default();
    hasher.update(details_json.as_bytes());
    hasher.update(b"\x00");

    format!("{:x}", hasher.finalize())
}

/// Hash de campo opcional: `\x00` = None, `\x01` + bytes + `\x00` = Some
fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_changes_with_any_field() {
        let base = compute_audit_hash(
            "genesis",
            1,
            1000,
            &AuditAction::EmployeeCreated,
            "employee",
            "employee:1",
            Some("user:1"),
            Some("Admin"),
            &serde_json::json!({"name": "Maria"}),
        );

        let other = compute_audit_hash(
            "genesis",
            1,
            1000,
            &AuditAction::EmployeeCreated,
            "employee",
            "employee:2",
            Some("user:1"),
            Some("Admin"),
            &serde_json::json!({"name": "Maria"}),
        );

        assert_ne!(base, other);
    }

    #[test]
    fn test_hash_distinguishes_none_from_empty() {
        let with_none = compute_audit_hash(
            "genesis",
            1,
            1000,
            &AuditAction::SystemStartup,
            "system",
            "server:main",
            None,
            None,
            &serde_json::json!({}),
        );
        let with_empty = compute_audit_hash(
            "genesis",
            1,
            1000,
            &AuditAction::SystemStartup,
            "system",
            "server:main",
            Some(""),
            None,
            &serde_json::json!({}),
        );
        assert_ne!(with_none, with_empty);
    }

    #[test]
    fn test_normalize_json_restores_integers() {
        let drifted = serde_json::json!({"count": 5.0, "nested": {"qty": 3.0}, "pi": 3.5});
        let normalized = normalize_json(&drifted);
        assert_eq!(normalized["count"], serde_json::json!(5));
        assert_eq!(normalized["nested"]["qty"], serde_json::json!(3));
        assert_eq!(normalized["pi"], serde_json::json!(3.5));
    }
}
