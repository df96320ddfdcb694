//! Autenticação e autorização
//!
//! - [`jwt`] - serviço de tokens e claims
//! - [`permissions`] - papéis e flags derivados
//! - [`middleware`] - gates de requisição

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_edit, require_export};
pub use permissions::Role;
