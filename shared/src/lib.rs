//! Tipos compartilhados do sistema DICA
//!
//! DTOs comuns usados na fronteira da API (servidor e clientes),
//! além de utilitários pequenos de tempo.

pub mod client;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
