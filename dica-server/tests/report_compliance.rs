//! Relatório previsto × realizado: totais, quebra por posto e série
//! diária calculados no servidor.
//!
//! Rodar: cargo test -p dica-server --test report_compliance

use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use dica_server::auth::Role;
use dica_server::core::{Config, ServerState, build_router};
use dica_server::db::models::{
    AllocationBatch, AllocationEntry, AllocationStatus, EmployeeCreate, ServicePostCreate,
};
use dica_server::db::repository::{
    AllocationRepository, EmployeeRepository, ServicePostRepository,
};
use surrealdb::RecordId;

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await;
    (state, tmp)
}

async fn seed_month(state: &ServerState) -> (RecordId, RecordId) {
    let post_repo = ServicePostRepository::new(state.db.clone());
    let post_a = post_repo
        .create(ServicePostCreate {
            code: "P01".to_string(),
            name: "Posto Norte".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();
    let post_b = post_repo
        .create(ServicePostCreate {
            code: "P02".to_string(),
            name: "Posto Sul".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let emp_repo = EmployeeRepository::new(state.db.clone());
    let emp = emp_repo
        .create(EmployeeCreate {
            name: "Maria Silva".to_string(),
            cpf: "52998224725".to_string(),
            funcao: "Vigilante".to_string(),
            unit: "UN-BC".to_string(),
            service_post: Some(post_a.clone()),
            admission_date: "2024-01-15".to_string(),
        })
        .await
        .unwrap()
        .id
        .unwrap();

    let alloc_repo = AllocationRepository::new(state.db.clone());

    // posto A: 4 previstos, 3 presentes
    let statuses = [
        ("2025-03-03", AllocationStatus::Present),
        ("2025-03-04", AllocationStatus::Present),
        ("2025-03-05", AllocationStatus::Present),
        ("2025-03-06", AllocationStatus::Absent),
    ];
    alloc_repo
        .batch_save(AllocationBatch {
            service_post: post_a.clone(),
            entries: statuses
                .iter()
                .map(|(date, status)| AllocationEntry {
                    employee: emp.clone(),
                    date: date.to_string(),
                    status: *status,
                    notes: None,
                })
                .collect(),
        })
        .await
        .unwrap();

    // posto B: 2 previstos, 0 presentes
    alloc_repo
        .batch_save(AllocationBatch {
            service_post: post_b.clone(),
            entries: vec![
                AllocationEntry {
                    employee: emp.clone(),
                    date: "2025-03-03".to_string(),
                    status: AllocationStatus::Vacation,
                    notes: None,
                },
                AllocationEntry {
                    employee: emp.clone(),
                    date: "2025-03-04".to_string(),
                    status: AllocationStatus::MedicalLeave,
                    notes: None,
                },
            ],
        })
        .await
        .unwrap();

    (post_a, post_b)
}

async fn fetch_report(state: &ServerState, uri: &str) -> serde_json::Value {
    let app = build_router(state.clone());
    let token = state
        .jwt_service
        .generate_token("user:test", "fiscal", "Fiscal", Role::FiscalPetrobras)
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn summary_counts_and_rounds() {
    let (state, _tmp) = test_state().await;
    seed_month(&state).await;

    let report = fetch_report(&state, "/api/reports/previsto-realizado?month=2025-03").await;

    // 6 previstos no total, 3 presentes → 50%
    assert_eq!(report["summary"]["previsto"], 6);
    assert_eq!(report["summary"]["realizado"], 3);
    assert_eq!(report["summary"]["compliance"], 50);
}

#[tokio::test]
async fn by_post_breakdown_is_per_post() {
    let (state, _tmp) = test_state().await;
    let (post_a, post_b) = seed_month(&state).await;

    let report = fetch_report(&state, "/api/reports/previsto-realizado?month=2025-03").await;
    let by_post = report["by_post"].as_array().unwrap();
    assert_eq!(by_post.len(), 2);

    let find = |id: &RecordId| {
        by_post
            .iter()
            .find(|p| p["service_post"] == id.to_string())
            .unwrap()
    };

    let a = find(&post_a);
    assert_eq!(a["previsto"], 4);
    assert_eq!(a["realizado"], 3);
    assert_eq!(a["compliance"], 75);
    assert_eq!(a["post_name"], "Posto Norte");

    // posto sem presenças: 0%, nunca negativo
    let b = find(&post_b);
    assert_eq!(b["previsto"], 2);
    assert_eq!(b["realizado"], 0);
    assert_eq!(b["compliance"], 0);
}

#[tokio::test]
async fn post_filter_narrows_the_report() {
    let (state, _tmp) = test_state().await;
    let (post_a, _post_b) = seed_month(&state).await;

    let uri = format!(
        "/api/reports/previsto-realizado?month=2025-03&service_post={}",
        post_a
    );
    let report = fetch_report(&state, &uri).await;

    assert_eq!(report["summary"]["previsto"], 4);
    assert_eq!(report["summary"]["realizado"], 3);
    assert_eq!(report["summary"]["compliance"], 75);
    assert_eq!(report["by_post"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn by_date_covers_whole_month() {
    let (state, _tmp) = test_state().await;
    seed_month(&state).await;

    let report = fetch_report(&state, "/api/reports/previsto-realizado?month=2025-03").await;
    let by_date = report["by_date"].as_array().unwrap();

    // série completa: um ponto por dia de março
    assert_eq!(by_date.len(), 31);
    assert_eq!(by_date[0]["date"], "2025-03-01");
    assert_eq!(by_date[0]["previsto"], 0);

    let day3 = by_date.iter().find(|d| d["date"] == "2025-03-03").unwrap();
    assert_eq!(day3["previsto"], 2); // um em cada posto
    assert_eq!(day3["realizado"], 1);
    assert_eq!(day3["compliance"], 50);
}

#[tokio::test]
async fn empty_month_reports_zero_compliance() {
    let (state, _tmp) = test_state().await;
    seed_month(&state).await;

    // mês sem nenhuma alocação: previsto = 0 → compliance = 0
    let report = fetch_report(&state, "/api/reports/previsto-realizado?month=2025-07").await;
    assert_eq!(report["summary"]["previsto"], 0);
    assert_eq!(report["summary"]["compliance"], 0);
}
