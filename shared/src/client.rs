//! Tipos da fronteira da API compartilhados entre servidor e clientes
//!
//! Request/response comuns da autenticação. Os demais DTOs vivem junto
//! aos handlers no servidor.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Requisição de login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Resposta de login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Informações do usuário autenticado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub flags: RoleFlags,
    pub is_active: bool,
}

/// Booleanos derivados do papel do usuário
///
/// Os mesmos quatro flags que a interface consulta para exibir ou
/// esconder controles. A autorização efetiva acontece no servidor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub can_edit: bool,
    pub can_export: bool,
    pub is_view_only: bool,
}
