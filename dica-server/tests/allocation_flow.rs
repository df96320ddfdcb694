//! Fluxo da grade de alocação: lote transacional, grade mensal,
//! cópia de competência e importação CSV.
//!
//! Rodar: cargo test -p dica-server --test allocation_flow

use dica_server::core::{Config, ServerState};
use dica_server::db::models::{
    AllocationBatch, AllocationEntry, AllocationStatus, CopyMonthRequest, EmployeeCreate,
    EmployeeStatus, EmployeeUpdate, ServicePostCreate,
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

async fn seed_post(state: &ServerState, code: &str) -> RecordId {
    let repo = ServicePostRepository::new(state.db.clone());
    let post = repo
        .create(ServicePostCreate {
            code: code.to_string(),
            name: format!("Posto {}", code),
        })
        .await
        .unwrap();
    post.id.unwrap()
}

async fn seed_employee(state: &ServerState, name: &str, cpf: &str, post: &RecordId) -> RecordId {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .create(EmployeeCreate {
            name: name.to_string(),
            cpf: cpf.to_string(),
            funcao: "Vigilante".to_string(),
            unit: "UN-BC".to_string(),
            service_post: Some(post.clone()),
            admission_date: "2024-01-15".to_string(),
        })
        .await
        .unwrap();
    employee.id.unwrap()
}

fn entry(employee: &RecordId, date: &str, status: AllocationStatus) -> AllocationEntry {
    AllocationEntry {
        employee: employee.clone(),
        date: date.to_string(),
        status,
        notes: None,
    }
}

#[tokio::test]
async fn batch_save_upserts_on_employee_date() {
    let (state, _tmp) = test_state().await;
    let post = seed_post(&state, "P01").await;
    let emp = seed_employee(&state, "Maria Silva", "52998224725", &post).await;

    let repo = AllocationRepository::new(state.db.clone());

    let saved = repo
        .batch_save(AllocationBatch {
            service_post: post.clone(),
            entries: vec![
                entry(&emp, "2025-03-03", AllocationStatus::Present),
                entry(&emp, "2025-03-04", AllocationStatus::Absent),
            ],
        })
        .await
        .unwrap();
    assert_eq!(saved, 2);

    // editar a mesma célula substitui em vez de duplicar
    repo.batch_save(AllocationBatch {
        service_post: post.clone(),
        entries: vec![entry(&emp, "2025-03-04", AllocationStatus::Justified)],
    })
    .await
    .unwrap();

    let rows = repo.find_month(&post.to_string(), 2025, 3).await.unwrap();
    assert_eq!(rows.len(), 2);
    let day4 = rows.iter().find(|r| r.date == "2025-03-04").unwrap();
    assert_eq!(day4.status, AllocationStatus::Justified);
}

#[tokio::test]
async fn batch_with_unknown_employee_changes_nothing() {
    let (state, _tmp) = test_state().await;
    let post = seed_post(&state, "P02").await;
    let emp = seed_employee(&state, "João Souza", "11144477735", &post).await;
    let ghost: RecordId = "employee:nao_existe".parse().unwrap();

    let repo = AllocationRepository::new(state.db.clone());
    let result = repo
        .batch_save(AllocationBatch {
            service_post: post.clone(),
            entries: vec![
                entry(&emp, "2025-03-03", AllocationStatus::Present),
                entry(&ghost, "2025-03-03", AllocationStatus::Present),
            ],
        })
        .await;

    assert!(result.is_err());

    // lote atômico: a entrada válida também não entrou
    let rows = repo.find_month(&post.to_string(), 2025, 3).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn copy_month_mirrors_source_rows() {
    let (state, _tmp) = test_state().await;
    let post = seed_post(&state, "P03").await;
    let emp_a = seed_employee(&state, "Ana Lima", "52998224725", &post).await;
    let emp_b = seed_employee(&state, "Bruno Costa", "11144477735", &post).await;

    let repo = AllocationRepository::new(state.db.clone());

    // competência de origem: fevereiro/2025
    let mut entries = Vec::new();
    for day in ["2025-02-03", "2025-02-04", "2025-02-05"] {
        entries.push(entry(&emp_a, day, AllocationStatus::Present));
        entries.push(entry(&emp_b, day, AllocationStatus::Absent));
    }
    repo.batch_save(AllocationBatch {
        service_post: post.clone(),
        entries,
    })
    .await
    .unwrap();

    // o destino já tem uma linha que deve ser substituída
    repo.batch_save(AllocationBatch {
        service_post: post.clone(),
        entries: vec![entry(&emp_a, "2025-03-10", AllocationStatus::Vacation)],
    })
    .await
    .unwrap();

    let result = repo
        .copy_month(CopyMonthRequest {
            service_post: post.clone(),
            target_month: "2025-03".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.copied, 6);
    assert_eq!(result.dropped, 0);

    let march = repo.find_month(&post.to_string(), 2025, 3).await.unwrap();
    // exatamente as linhas da origem, datas espelhadas; a linha antiga sumiu
    assert_eq!(march.len(), 6);
    assert!(march.iter().all(|r| r.date.starts_with("2025-03")));
    assert!(!march.iter().any(|r| r.date == "2025-03-10"));
    let mirrored: Vec<&str> = march.iter().map(|r| r.date.as_str()).collect();
    assert!(mirrored.contains(&"2025-03-03"));
    assert!(mirrored.contains(&"2025-03-05"));
}

#[tokio::test]
async fn copy_month_drops_days_missing_in_target() {
    let (state, _tmp) = test_state().await;
    let post = seed_post(&state, "P04").await;
    let emp = seed_employee(&state, "Carla Dias", "52998224725", &post).await;

    let repo = AllocationRepository::new(state.db.clone());

    // 30 e 31 de janeiro não existem em fevereiro/2025
    repo.batch_save(AllocationBatch {
        service_post: post.clone(),
        entries: vec![
            entry(&emp, "2025-01-28", AllocationStatus::Present),
            entry(&emp, "2025-01-30", AllocationStatus::Present),
            entry(&emp, "2025-01-31", AllocationStatus::Present),
        ],
    })
    .await
    .unwrap();

    let result = repo
        .copy_month(CopyMonthRequest {
            service_post: post.clone(),
            target_month: "2025-02".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.copied, 1);
    assert_eq!(result.dropped, 2);
}

#[tokio::test]
async fn inactive_employee_leaves_grid_rows() {
    let (state, _tmp) = test_state().await;
    let post = seed_post(&state, "P05").await;
    let active = seed_employee(&state, "Diego Reis", "52998224725", &post).await;
    let inactive = seed_employee(&state, "Elisa Rocha", "11144477735", &post).await;

    let repo = EmployeeRepository::new(state.db.clone());
    repo.update(
        &inactive.to_string(),
        EmployeeUpdate {
            name: None,
            funcao: None,
            unit: None,
            status: Some(EmployeeStatus::Inactive),
            service_post: None,
            admission_date: None,
        },
    )
    .await
    .unwrap();

    let grid_rows = repo.find_active_by_post(&post.to_string()).await.unwrap();
    let ids: Vec<String> = grid_rows
        .iter()
        .map(|e| e.id.as_ref().unwrap().to_string())
        .collect();

    assert!(ids.contains(&active.to_string()));
    assert!(!ids.contains(&inactive.to_string()));
}

#[tokio::test]
async fn employee_with_history_is_deactivated_not_deleted() {
    let (state, _tmp) = test_state().await;
    let post = seed_post(&state, "P06").await;
    let emp = seed_employee(&state, "Fábio Nunes", "52998224725", &post).await;

    let alloc_repo = AllocationRepository::new(state.db.clone());
    alloc_repo
        .batch_save(AllocationBatch {
            service_post: post.clone(),
            entries: vec![entry(&emp, "2025-03-03", AllocationStatus::Present)],
        })
        .await
        .unwrap();

    let repo = EmployeeRepository::new(state.db.clone());
    repo.delete(&emp.to_string()).await.unwrap();

    // registro permanece, mas inativo; o histórico da grade sobrevive
    let kept = repo.find_by_id(&emp.to_string()).await.unwrap().unwrap();
    assert_eq!(kept.status, EmployeeStatus::Inactive);
    let rows = alloc_repo.find_month(&post.to_string(), 2025, 3).await.unwrap();
    assert_eq!(rows.len(), 1);
}
