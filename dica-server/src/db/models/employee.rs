//! Modelo de funcionário (mão de obra contratada)

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tipo de ID do funcionário
pub type EmployeeId = RecordId;

/// Situação do funcionário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

/// Funcionário alocado ao contrato
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<EmployeeId>,
    /// Nome completo
    pub name: String,
    /// CPF, apenas dígitos
    pub cpf: String,
    /// Função/cargo no posto
    pub funcao: String,
    /// Unidade/lotação
    pub unit: String,
    #[serde(default)]
    pub status: EmployeeStatus,
    /// Posto de serviço vinculado (opcional)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub service_post: Option<RecordId>,
    /// Data de admissão `YYYY-MM-DD`
    pub admission_date: String,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// Payload de criação
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub cpf: String,
    pub funcao: String,
    pub unit: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub service_post: Option<RecordId>,
    pub admission_date: String,
}

/// Payload de alteração
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funcao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub service_post: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
}

/// Normaliza um CPF para apenas dígitos
pub fn normalize_cpf(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Valida um CPF (11 dígitos + dígitos verificadores)
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || cpf.len() != 11 {
        return false;
    }
    // sequências repetidas (000..., 111...) são inválidas
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, &d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 { 0 } else { rem }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cpf_accepts_valid() {
        // CPF de exemplo com verificadores corretos
        assert!(validate_cpf("52998224725"));
        assert!(validate_cpf("11144477735"));
    }

    #[test]
    fn test_validate_cpf_rejects_bad_check_digits() {
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("11144477734"));
    }

    #[test]
    fn test_validate_cpf_rejects_malformed() {
        assert!(!validate_cpf(""));
        assert!(!validate_cpf("123"));
        assert!(!validate_cpf("00000000000"));
        assert!(!validate_cpf("529.982.247-25")); // deve estar normalizado
    }

    #[test]
    fn test_normalize_cpf() {
        assert_eq!(normalize_cpf("529.982.247-25"), "52998224725");
        assert!(validate_cpf(&normalize_cpf("529.982.247-25")));
    }
}
