//! Cálculo de diff JSON para auditoria
//!
//! Compara o antes e o depois de uma alteração e gera a lista de
//! mudanças por campo. Objetos aninhados são comparados recursivamente;
//! números usam tolerância para absorver perda de precisão na
//! serialização.

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;

/// Tolerância de comparação de ponto flutuante
const FLOAT_EPSILON: f64 = 1e-9;

/// Compara dois valores JSON (números com tolerância)
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(fa), Some(fb)) => (fa - fb).abs() < FLOAT_EPSILON,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(va, vb)| values_equal(va, vb))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, va)| b.get(key).is_some_and(|vb| values_equal(va, vb)))
        }
        _ => false,
    }
}

/// Mudança de um campo
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub from: Value,
    pub to: Value,
}

/// Configuração de snapshot por entidade
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Campos excluídos do registro (sensíveis ou redundantes)
    pub exclude_fields: &'static [&'static str],
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            exclude_fields: &["id"],
        }
    }
}

/// Configuração de auditoria por tipo de entidade
pub fn get_config(entity_type: &str) -> AuditConfig {
    match entity_type {
        "user" => AuditConfig {
            exclude_fields: &["id", "hash_pass"],
        },
        _ => AuditConfig::default(),
    }
}

// ============================================================================
// Algoritmo de diff
// ============================================================================

/// Diferença recursiva entre dois valores JSON
fn diff_json_recursive(from: &Value, to: &Value, path: &str, changes: &mut Vec<FieldChange>) {
    match (from, to) {
        // objetos: compara campo a campo
        (Value::Object(from_obj), Value::Object(to_obj)) => {
            let mut all_keys: HashSet<&String> = from_obj.keys().collect();
            all_keys.extend(to_obj.keys());

            for key in all_keys {
                let field_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                match (from_obj.get(key), to_obj.get(key)) {
                    (Some(f), Some(t)) => {
                        diff_json_recursive(f, t, &field_path, changes);
                    }
                    (Some(f), None) => {
                        changes.push(FieldChange {
                            field: field_path,
                            from: f.clone(),
                            to: Value::Null,
                        });
                    }
                    (None, Some(t)) => {
                        changes.push(FieldChange {
                            field: field_path,
                            from: Value::Null,
                            to: t.clone(),
                        });
                    }
                    (None, None) => unreachable!(),
                }
            }
        }

        // arrays: comparação com tolerância, registrados inteiros
        (Value::Array(_), Value::Array(_)) => {
            if !values_equal(from, to) {
                changes.push(FieldChange {
                    field: path.to_string(),
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        // números: tolerância de ponto flutuante
        (Value::Number(from_num), Value::Number(to_num)) => {
            let are_equal = match (from_num.as_f64(), to_num.as_f64()) {
                (Some(f), Some(t)) => (f - t).abs() < FLOAT_EPSILON,
                _ => from_num == to_num,
            };
            if !are_equal {
                changes.push(FieldChange {
                    field: path.to_string(),
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        // demais tipos: comparação direta
        (f, t) => {
            if f != t {
                changes.push(FieldChange {
                    field: path.to_string(),
                    from: f.clone(),
                    to: t.clone(),
                });
            }
        }
    }
}

/// Remove campos excluídos do objeto
fn filter_fields(value: &mut Value, exclude: &[&str]) {
    if let Value::Object(obj) = value {
        for field in exclude {
            obj.remove(*field);
        }
    }
}

// ============================================================================
// API pública
// ============================================================================

/// Detalhes de auditoria de um CREATE (snapshot filtrado)
pub fn create_snapshot<T: Serialize>(value: &T, entity_type: &str) -> Value {
    let config = get_config(entity_type);

    match serde_json::to_value(value) {
        Ok(mut json) => {
            filter_fields(&mut json, config.exclude_fields);
            json
        }
        Err(e) => {
            tracing::error!("Failed to serialize audit snapshot: {:?}", e);
            json!({"error": "serialization_failed"})
        }
    }
}

/// Detalhes de auditoria de um UPDATE
///
/// Formato: `{"changes": [{"field": "name", "from": "A", "to": "B"}, ...]}`
pub fn create_diff<T: Serialize>(from: &T, to: &T, entity_type: &str) -> Value {
    let config = get_config(entity_type);

    let from_json = match serde_json::to_value(from) {
        Ok(mut v) => {
            filter_fields(&mut v, config.exclude_fields);
            v
        }
        Err(e) => {
            tracing::error!("Failed to serialize 'from' for diff: {:?}", e);
            return json!({"error": "serialization_failed"});
        }
    };

    let to_json = match serde_json::to_value(to) {
        Ok(mut v) => {
            filter_fields(&mut v, config.exclude_fields);
            v
        }
        Err(e) => {
            tracing::error!("Failed to serialize 'to' for diff: {:?}", e);
            return json!({"error": "serialization_failed"});
        }
    };

    let mut changes = Vec::new();
    diff_json_recursive(&from_json, &to_json, "", &mut changes);

    if changes.is_empty() {
        json!({"changes": [], "note": "no_changes_detected"})
    } else {
        json!({"changes": changes})
    }
}

/// Detalhes de auditoria de um DELETE (identificador)
pub fn create_delete_details(name: &str) -> Value {
    json!({"name": name})
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestEmployee {
        id: String,
        name: String,
        funcao: String,
        unit: String,
    }

    #[derive(Serialize)]
    struct TestUser {
        id: String,
        username: String,
        hash_pass: String,
        role: String,
    }

    #[test]
    fn test_create_snapshot_filters_id() {
        let employee = TestEmployee {
            id: "employee:123".to_string(),
            name: "Maria Silva".to_string(),
            funcao: "Técnica de Segurança".to_string(),
            unit: "UN-BC".to_string(),
        };

        let snapshot = create_snapshot(&employee, "employee");
        let obj = snapshot.as_object().unwrap();

        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("funcao"));
        assert!(!obj.contains_key("id"));
    }

    #[test]
    fn test_create_snapshot_filters_sensitive_fields() {
        let user = TestUser {
            id: "user:1".to_string(),
            username: "admin".to_string(),
            hash_pass: "$argon2$secret".to_string(),
            role: "admin".to_string(),
        };

        let snapshot = create_snapshot(&user, "user");
        let obj = snapshot.as_object().unwrap();

        assert!(obj.contains_key("username"));
        assert!(obj.contains_key("role"));
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("hash_pass"));
    }

    #[test]
    fn test_create_diff_simple_fields() {
        let from = TestEmployee {
            id: "employee:1".to_string(),
            name: "Maria Silva".to_string(),
            funcao: "Auxiliar".to_string(),
            unit: "UN-BC".to_string(),
        };
        let to = TestEmployee {
            id: "employee:1".to_string(),
            name: "Maria Silva".to_string(),
            funcao: "Supervisora".to_string(),
            unit: "UN-RIO".to_string(),
        };

        let diff = create_diff(&from, &to, "employee");
        let changes = diff["changes"].as_array().unwrap();

        assert_eq!(changes.len(), 2);

        let fields: Vec<&str> = changes
            .iter()
            .map(|c| c["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"funcao"));
        assert!(fields.contains(&"unit"));
    }

    #[test]
    fn test_create_diff_no_changes() {
        let employee = TestEmployee {
            id: "employee:1".to_string(),
            name: "Maria Silva".to_string(),
            funcao: "Auxiliar".to_string(),
            unit: "UN-BC".to_string(),
        };

        let diff = create_diff(&employee, &employee, "employee");
        let changes = diff["changes"].as_array().unwrap();

        assert!(changes.is_empty());
        assert!(diff.get("note").is_some());
    }

    #[test]
    fn test_create_delete_details() {
        let details = create_delete_details("Posto Norte");
        assert_eq!(details["name"], "Posto Norte");
    }
}
