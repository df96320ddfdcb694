//! Importação/exportação CSV da grade e execuções de atividade.
//!
//! Rodar: cargo test -p dica-server --test csv_and_executions

use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use dica_server::auth::Role;
use dica_server::core::{Config, ServerState, build_router};
use dica_server::db::models::{
    ActivityExecutionCreate, ActivityFrequency, EmployeeCreate, ServiceActivityCreate,
    ServicePostCreate,
};
use dica_server::db::repository::{
    ActivityExecutionRepository, AllocationRepository, EmployeeRepository,
    ServiceActivityRepository, ServicePostRepository,
};
use surrealdb::RecordId;

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await;
    (state, tmp)
}

async fn seed_post_and_employee(state: &ServerState) -> (RecordId, RecordId) {
    let post = ServicePostRepository::new(state.db.clone())
        .create(ServicePostCreate {
            code: "P01".to_string(),
            name: "Posto Norte".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();
    let emp = EmployeeRepository::new(state.db.clone())
        .create(EmployeeCreate {
            name: "Maria Silva".to_string(),
            cpf: "52998224725".to_string(),
            funcao: "Vigilante".to_string(),
            unit: "UN-BC".to_string(),
            service_post: Some(post.clone()),
            admission_date: "2024-01-15".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();
    (post, emp)
}

fn operator_token(state: &ServerState) -> String {
    state
        .jwt_service
        .generate_token("user:test", "operador", "Operador", Role::OperatorDica)
        .unwrap()
}

#[tokio::test]
async fn csv_import_reports_invalid_rows_without_creating() {
    let (state, _tmp) = test_state().await;
    let (post, emp) = seed_post_and_employee(&state).await;
    let app = build_router(state.clone());
    let token = operator_token(&state);

    let emp_key = emp.key().to_string();
    let csv = format!(
        "employee_id,date,status\n\
         {emp_key},2025-03-03,present\n\
         {emp_key},2025-03-04,ferias\n\
         {emp_key},33/03/2025,present\n\
         employee:fantasma,2025-03-05,present\n"
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/allocations/import-csv?service_post={}", post))
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "text/csv")
                .body(Body::from(csv))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let result: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    // 1 válida; status inválido, data inválida e funcionário desconhecido
    assert_eq!(result["imported"], 1);
    assert_eq!(result["error_count"], 3);

    // a linha de status inválido não virou alocação
    let repo = AllocationRepository::new(state.db.clone());
    let rows = repo.find_month(&post.to_string(), 2025, 3).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2025-03-03");
}

#[tokio::test]
async fn csv_import_rejects_wrong_header() {
    let (state, _tmp) = test_state().await;
    let (post, _emp) = seed_post_and_employee(&state).await;
    let app = build_router(state.clone());
    let token = operator_token(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/allocations/import-csv?service_post={}", post))
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "text/csv")
                .body(Body::from("matricula,dia,situacao\nx,2025-03-03,present\n"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn csv_template_matches_import_header() {
    let (state, _tmp) = test_state().await;
    let app = build_router(state.clone());
    let token = operator_token(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/allocations/template.csv")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"employee_id,date,status\n");
}

#[tokio::test]
async fn execution_quantity_must_be_non_negative() {
    let (state, _tmp) = test_state().await;
    let (post, _emp) = seed_post_and_employee(&state).await;

    let activity = ServiceActivityRepository::new(state.db.clone())
        .create(
            &post.to_string(),
            ServiceActivityCreate {
                name: "Ronda noturna".to_string(),
                frequency: ActivityFrequency::Daily,
                unit: "rondas".to_string(),
                expected_quantity: Some(4),
            },
        )
        .await
        .unwrap();
    let activity_id = activity.id.unwrap();

    let repo = ActivityExecutionRepository::new(state.db.clone());

    let negative = repo
        .create(ActivityExecutionCreate {
            service_activity: activity_id.clone(),
            date: "2025-03-03".to_string(),
            quantity: -1,
            employee: None,
            notes: None,
        })
        .await;
    assert!(negative.is_err());

    let ok = repo
        .create(ActivityExecutionCreate {
            service_activity: activity_id.clone(),
            date: "2025-03-03".to_string(),
            quantity: 4,
            employee: None,
            notes: Some("turno completo".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(ok.quantity, 4);
    assert_eq!(ok.service_post, post);

    // (atividade, data) é único: segundo lançamento no mesmo dia falha
    let duplicate = repo
        .create(ActivityExecutionCreate {
            service_activity: activity_id,
            date: "2025-03-03".to_string(),
            quantity: 2,
            employee: None,
            notes: None,
        })
        .await;
    assert!(duplicate.is_err());
}
