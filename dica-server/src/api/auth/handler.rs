//! Handlers de autenticação
//!
//! Login, sessão atual e logout.

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::audit::AuditAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

// DTOs compartilhados com os clientes
use shared::client::{LoginRequest, LoginResponse, UserInfo};

/// Atraso fixo da autenticação (mitiga timing attack)
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Valida as credenciais e devolve o token JWT com os flags derivados
/// do papel. Mensagem de erro unificada para não revelar se o usuário
/// existe.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = UserRepository::new(state.get_db());
    let username = req.username.clone();

    let user = repo
        .find_by_username(&username)
        .await
        .map_err(|e| AppError::database(format!("Query failed: {}", e)))?;

    // atraso fixo antes de avaliar o resultado
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                state
                    .audit_service
                    .log(
                        AuditAction::LoginFailed,
                        "auth",
                        format!("user:{}", username),
                        None,
                        serde_json::json!({"reason": "invalid_credentials"}),
                    )
                    .await;
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            state
                .audit_service
                .log(
                    AuditAction::LoginFailed,
                    "auth",
                    format!("user:{}", username),
                    None,
                    serde_json::json!({"reason": "user_not_found"}),
                )
                .await;
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(&user_id, &user.username, &user.display_name, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    let current = CurrentUser {
        id: user_id.clone(),
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        role: user.role,
    };
    state
        .audit_service
        .log(
            AuditAction::LoginSuccess,
            "auth",
            user_id.clone(),
            Some(&current),
            serde_json::json!({"username": &user.username}),
        )
        .await;

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    let response = LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            flags: user.role.flags(),
            is_active: user.is_active,
        },
    };

    Ok(Json(response))
}

/// GET /api/auth/me — dados do usuário autenticado
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    // is_active vem fresco do banco (a claim pode ter envelhecido)
    let repo = UserRepository::new(state.get_db());
    let is_active = repo
        .find_by_id(&user.id)
        .await
        .map_err(|e| AppError::database(format!("Failed to query user: {}", e)))?
        .map(|u| u.is_active)
        .unwrap_or(false);

    Ok(Json(UserInfo {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        role: user.role.as_str().to_string(),
        flags: user.role.flags(),
        is_active,
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<()>, AppError> {
    state
        .audit_service
        .log(
            AuditAction::Logout,
            "auth",
            user.id.clone(),
            Some(&user),
            serde_json::json!({"username": &user.username}),
        )
        .await;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        "User logged out"
    );

    Ok(Json(()))
}
