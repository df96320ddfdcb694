//! Middlewares de autenticação e autorização
//!
//! Autenticação JWT + gates derivados do papel do usuário.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService, Role};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Header de troca de papel, aceito apenas em ambiente de desenvolvimento
const DEV_ROLE_HEADER: &str = "x-dev-role";

/// Middleware de autenticação - exige usuário logado
///
/// Extrai e valida o JWT de `Authorization: Bearer <token>`.
/// Em caso de sucesso injeta [`CurrentUser`] nas extensions da
/// requisição (`req.extensions_mut().insert(user)`).
///
/// # Rotas que pulam autenticação
///
/// - `OPTIONS *` (preflight CORS)
/// - caminhos fora de `/api/` (inclui `/health`)
/// - `/api/auth/login`
///
/// # Erros
///
/// | Erro | Status HTTP |
/// |------|-------------|
/// | sem header Authorization | 401 Unauthorized |
/// | token expirado | 401 TokenExpired |
/// | token inválido | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Preflight CORS passa direto
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Rotas fora da API seguem para o 404 normal
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // Rotas públicas da API
    if path == "/api/auth/login" {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let mut user = CurrentUser::from_claims(claims)
                .map_err(|_| AppError::invalid_token("Invalid role claim"))?;

            // Troca de papel somente em desenvolvimento (testes locais da UI)
            if state.config.is_development()
                && let Some(dev_role) = req
                    .headers()
                    .get(DEV_ROLE_HEADER)
                    .and_then(|h| h.to_str().ok())
                    .and_then(Role::parse)
            {
                security_log!(
                    "INFO",
                    "dev_role_override",
                    user_id = user.id.clone(),
                    original_role = user.role.as_str(),
                    override_role = dev_role.as_str()
                );
                user.role = dev_role;
            }

            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Gate de edição - exige `can_edit`
///
/// admin, admin_dica e operator_dica passam; fiscal_petrobras e
/// viewer recebem 403.
pub async fn require_edit(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.role.can_edit() {
        security_log!(
            "WARN",
            "edit_denied",
            user_id = user.id.clone(),
            username = user.username.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::forbidden("Edit permission required"));
    }

    Ok(next.run(req).await)
}

/// Gate de administrador - exige `is_admin`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.role.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            username = user.username.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::forbidden("Administrator role required"));
    }

    Ok(next.run(req).await)
}

/// Gate de exportação - exige `can_export`
///
/// Cobre os endpoints de CSV e relatórios exportáveis.
pub async fn require_export(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.role.can_export() {
        security_log!(
            "WARN",
            "export_denied",
            user_id = user.id.clone(),
            username = user.username.clone(),
            user_role = user.role.as_str()
        );
        return Err(AppError::forbidden("Export permission required"));
    }

    Ok(next.run(req).await)
}
