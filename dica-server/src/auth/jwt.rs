//! Serviço de tokens JWT
//!
//! Geração, validação e parsing dos tokens de sessão.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::Role;

/// Configuração do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Segredo (mínimo 32 bytes)
    pub secret: String,
    /// Expiração do token (minutos)
    pub expiration_minutes: i64,
    /// Emissor
    pub issuer: String,
    /// Audiência
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(key) => key,
            Err(e) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT configuration error: {}, using emergency key", e);
                    "emergency-fallback-key-must-be-replaced-in-production".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("FATAL: JWT_SECRET configuration failed: {}", e);
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // padrão 24h
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "dica-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dica-clients".to_string()),
        }
    }
}

/// Claims armazenadas no token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// ID do usuário (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Nome de exibição
    pub display_name: String,
    /// Papel (snake_case)
    pub role: String,
    /// Tipo do token
    pub token_type: String,
    /// Expiração (timestamp)
    pub exp: i64,
    /// Emissão (timestamp)
    pub iat: i64,
    /// Emissor
    pub iss: String,
    /// Audiência
    pub aud: String,
}

/// Erros de JWT
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Gera um segredo imprimível seguro (uso em desenvolvimento)
pub fn generate_secure_printable_jwt_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut key = String::new();

    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            // rng indisponível: segredo fixo de desenvolvimento
            return "DicaServerDevelopmentSecureKey2025!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }

    key
}

/// Carrega o segredo JWT do ambiente
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set! Generating secure temporary key for development."
                );
                Ok(generate_secure_printable_jwt_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production!".to_string(),
                ))
            }
        }
    }
}

/// Serviço de tokens JWT
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Cria o serviço com a configuração padrão
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// Cria o serviço com configuração específica
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Gera um token para o usuário
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            role: role.as_str().to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Valida e decodifica um token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extrai o token do header Authorization
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Contexto do usuário autenticado (extraído das Claims)
///
/// Criado pelo middleware de autenticação e injetado nas extensions
/// da requisição.
///
/// # Exemplo
///
/// ```ignore
/// async fn handler(Extension(user): Extension<CurrentUser>) -> Json<()> {
///     if user.role.can_edit() {
///         // pode alterar registros
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// ID do usuário
    pub id: String,
    /// Username
    pub username: String,
    /// Nome de exibição
    pub display_name: String,
    /// Papel
    pub role: Role,
}

impl CurrentUser {
    /// Converte as claims validadas; falha se o papel for desconhecido
    pub fn from_claims(claims: Claims) -> Result<Self, JwtError> {
        let role = Role::parse(&claims.role)
            .ok_or_else(|| JwtError::InvalidToken(format!("unknown role: {}", claims.role)))?;
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            display_name: claims.display_name,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = JwtService::new();

        let token = service
            .generate_token("user:123", "maria.silva", "Maria Silva", Role::OperatorDica)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "user:123");
        assert_eq!(claims.username, "maria.silva");
        assert_eq!(claims.role, "operator_dica");
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = JwtService::new();
        let token = service
            .generate_token("user:9", "fiscal", "Fiscal", Role::FiscalPetrobras)
            .expect("Failed to generate test token");
        let claims = service.validate_token(&token).unwrap();

        let user = CurrentUser::from_claims(claims).expect("valid claims");
        assert_eq!(user.role, Role::FiscalPetrobras);
        assert!(user.role.can_export());
        assert!(!user.role.can_edit());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = JwtService::new();
        let token = service
            .generate_token("user:1", "admin", "Admin", Role::Admin)
            .expect("Failed to generate test token");

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_secret_generation_is_printable() {
        let key = generate_secure_printable_jwt_secret();
        assert_eq!(key.chars().count(), 64);
        assert!(key.is_ascii());
    }
}
