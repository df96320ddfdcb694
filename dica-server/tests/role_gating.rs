//! Autorização por papel nas rotas: viewer nunca escreve, fiscal
//! exporta mas não edita, operador edita mas não administra.
//!
//! Rodar: cargo test -p dica-server --test role_gating

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use tower::util::ServiceExt;

use dica_server::auth::Role;
use dica_server::core::{Config, ServerState, build_router};

async fn test_app() -> (Router, ServerState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    // o override de papel via X-Dev-Role só vale em desenvolvimento
    config.environment = "development".to_string();
    let state = ServerState::initialize(&config).await;
    let app = build_router(state.clone());
    (app, state, tmp)
}

fn token_for(state: &ServerState, role: Role) -> String {
    state
        .jwt_service
        .generate_token("user:test", "teste", "Usuário Teste", role)
        .unwrap()
}

fn post_employee_request(token: &str) -> Request<Body> {
    let body = serde_json::json!({
        "name": "Maria Silva",
        "cpf": "52998224725",
        "funcao": "Vigilante",
        "unit": "UN-BC",
        "admission_date": "2024-01-15"
    });
    Request::builder()
        .method("POST")
        .uri("/api/employees")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _state, _tmp) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/employees")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_needs_no_token() {
    let (app, _state, _tmp) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn viewer_reads_but_never_writes() {
    let (app, state, _tmp) = test_app().await;
    let token = token_for(&state, Role::Viewer);

    let read = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/employees")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::OK);

    let write = app.oneshot(post_employee_request(&token)).await.unwrap();
    assert_eq!(write.status(), StatusCode::FORBIDDEN);

    // nada foi criado
    let repo = dica_server::db::repository::EmployeeRepository::new(state.db.clone());
    assert!(repo.find_all_with_inactive().await.unwrap().is_empty());
}

#[tokio::test]
async fn fiscal_exports_but_does_not_edit() {
    let (app, state, _tmp) = test_app().await;
    let token = token_for(&state, Role::FiscalPetrobras);

    let write = app
        .clone()
        .oneshot(post_employee_request(&token))
        .await
        .unwrap();
    assert_eq!(write.status(), StatusCode::FORBIDDEN);

    // a exportação passa pelo gate (o posto não existe; o erro é 400, não 403)
    let export = app
        .oneshot(
            Request::builder()
                .uri("/api/allocations/export.csv?service_post=service_post:nenhum&month=2025-03")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_ne!(export.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn operator_edits_but_cannot_export_or_admin() {
    let (app, state, _tmp) = test_app().await;
    let token = token_for(&state, Role::OperatorDica);

    let write = app
        .clone()
        .oneshot(post_employee_request(&token))
        .await
        .unwrap();
    assert_eq!(write.status(), StatusCode::OK);

    let export = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/allocations/export.csv?service_post=service_post:x&month=2025-03")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(export.status(), StatusCode::FORBIDDEN);

    let admin_only = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/audit-logs")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(admin_only.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_dica_passes_admin_gate() {
    let (app, state, _tmp) = test_app().await;
    let token = token_for(&state, Role::AdminDica);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/audit-logs")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dev_role_header_overrides_in_development() {
    let (app, state, _tmp) = test_app().await;
    // token de admin, rebaixado a viewer pelo header de desenvolvimento
    let token = token_for(&state, Role::Admin);

    let mut request = post_employee_request(&token);
    request
        .headers_mut()
        .insert("x-dev-role", "viewer".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
