//! Papéis e permissões derivadas
//!
//! O papel é um enum fechado; os quatro booleanos consultados pela
//! interface são derivados dele. A autorização efetiva acontece nos
//! middlewares, sempre a partir destas derivações.

use serde::{Deserialize, Serialize};

use shared::client::RoleFlags;

/// Papel do usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrador geral
    Admin,
    /// Administrador da contratada
    AdminDica,
    /// Operador da contratada
    OperatorDica,
    /// Fiscal do contrato (leitura + exportação)
    FiscalPetrobras,
    /// Somente leitura
    Viewer,
}

impl Role {
    /// Interpreta o nome do papel (formato snake_case da claim JWT)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "admin_dica" => Some(Role::AdminDica),
            "operator_dica" => Some(Role::OperatorDica),
            "fiscal_petrobras" => Some(Role::FiscalPetrobras),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::AdminDica => "admin_dica",
            Role::OperatorDica => "operator_dica",
            Role::FiscalPetrobras => "fiscal_petrobras",
            Role::Viewer => "viewer",
        }
    }

    /// admin ou admin_dica
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::AdminDica)
    }

    /// Pode criar/alterar registros: admin ou operator_dica
    pub fn can_edit(&self) -> bool {
        self.is_admin() || matches!(self, Role::OperatorDica)
    }

    /// Pode exportar relatórios/CSV: admin ou fiscal_petrobras
    pub fn can_export(&self) -> bool {
        self.is_admin() || matches!(self, Role::FiscalPetrobras)
    }

    /// Perfil somente leitura: viewer ou fiscal_petrobras
    pub fn is_view_only(&self) -> bool {
        matches!(self, Role::Viewer | Role::FiscalPetrobras)
    }

    /// Os quatro flags derivados, como a interface consome
    pub fn flags(&self) -> RoleFlags {
        RoleFlags {
            is_admin: self.is_admin(),
            can_edit: self.can_edit(),
            can_export: self.can_export(),
            is_view_only: self.is_view_only(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for role in [
            Role::Admin,
            Role::AdminDica,
            Role::OperatorDica,
            Role::FiscalPetrobras,
            Role::Viewer,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("gerente"), None);
    }

    #[test]
    fn test_admin_derivations() {
        for role in [Role::Admin, Role::AdminDica] {
            assert!(role.is_admin());
            assert!(role.can_edit());
            assert!(role.can_export());
            assert!(!role.is_view_only());
        }
    }

    #[test]
    fn test_operator_edits_but_does_not_export() {
        let role = Role::OperatorDica;
        assert!(!role.is_admin());
        assert!(role.can_edit());
        assert!(!role.can_export());
        assert!(!role.is_view_only());
    }

    #[test]
    fn test_fiscal_exports_but_does_not_edit() {
        let role = Role::FiscalPetrobras;
        assert!(!role.is_admin());
        assert!(!role.can_edit());
        assert!(role.can_export());
        assert!(role.is_view_only());
    }

    #[test]
    fn test_viewer_has_nothing() {
        let role = Role::Viewer;
        assert!(!role.is_admin());
        assert!(!role.can_edit());
        assert!(!role.can_export());
        assert!(role.is_view_only());
    }
}
