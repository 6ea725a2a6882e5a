use std::sync::Arc;

use todostore::{ServiceError, StoreConfig, TodoService};

fn memory_config() -> StoreConfig {
    StoreConfig {
        database_url: "sqlite::memory:".into(),
        ..StoreConfig::default()
    }
}

async fn ready_service() -> TodoService {
    let _ = env_logger::builder().is_test(true).try_init();
    let service = TodoService::new(memory_config());
    service.initialize().await.expect("initialize service");
    service
}

#[tokio::test]
async fn operations_before_initialize_are_rejected() {
    let service = TodoService::new(memory_config());

    match service.get_all_todos().await {
        Err(ServiceError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {:?}", other.map(|v| v.len())),
    }
    match service.add_todo("buy milk").await {
        Err(ServiceError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {:?}", other.map(|t| t.text)),
    }
}

#[tokio::test]
async fn initialize_is_reentrant() {
    let service = ready_service().await;
    service.add_todo("survives").await.expect("add");

    service.initialize().await.expect("second initialize");

    assert_eq!(service.get_all_todos().await.expect("list").len(), 1);
}

#[tokio::test]
async fn concurrent_initializers_share_one_store() {
    let _ = env_logger::builder().is_test(true).try_init();
    let service = Arc::new(TodoService::new(memory_config()));

    let a = Arc::clone(&service);
    let b = Arc::clone(&service);
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { a.initialize().await }),
        tokio::spawn(async move { b.initialize().await }),
    );
    ra.expect("join").expect("initialize a");
    rb.expect("join").expect("initialize b");

    // Both callers ended up on the same store: one insert, one row.
    service.add_todo("only once").await.expect("add");
    assert_eq!(service.get_all_todos().await.expect("list").len(), 1);
}

#[tokio::test]
async fn add_todo_rejects_blank_text() {
    let service = ready_service().await;

    for input in ["", "   ", "\t\n"] {
        match service.add_todo(input).await {
            Err(ServiceError::Validation(_)) => {}
            other => panic!("expected Validation for {input:?}, got {:?}", other.map(|t| t.text)),
        }
    }
}

#[tokio::test]
async fn add_todo_trims_and_stamps_defaults() {
    let service = ready_service().await;
    let before = chrono::Utc::now();

    let task = service.add_todo("  buy milk  ").await.expect("add");

    assert_eq!(task.text, "buy milk");
    assert!(!task.completed);
    assert!(task.created_at >= before && task.created_at <= chrono::Utc::now());
}

#[tokio::test]
async fn toggle_flips_completion_both_ways() {
    let service = ready_service().await;
    let task = service.add_todo("buy milk").await.expect("add");

    let toggled = service
        .toggle_todo(&task.id)
        .await
        .expect("toggle")
        .expect("exists");
    assert!(toggled.completed);

    let back = service
        .toggle_todo(&task.id)
        .await
        .expect("toggle")
        .expect("exists");
    assert!(!back.completed);
}

#[tokio::test]
async fn update_todo_text_rejects_blank_and_trims() {
    let service = ready_service().await;
    let task = service.add_todo("buy milk").await.expect("add");

    match service.update_todo_text(&task.id, "   ").await {
        Err(ServiceError::Validation(_)) => {}
        other => panic!("expected Validation, got {:?}", other.map(|t| t.map(|t| t.text))),
    }

    let updated = service
        .update_todo_text(&task.id, "  buy bread ")
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.text, "buy bread");
}

#[tokio::test]
async fn unknown_ids_report_not_found_never_error() {
    let service = ready_service().await;

    assert!(service.toggle_todo("nope").await.expect("toggle").is_none());
    assert!(service
        .update_todo_text("nope", "x")
        .await
        .expect("update")
        .is_none());
    assert!(service
        .update_todo("nope", None, Some(true))
        .await
        .expect("update")
        .is_none());
    assert!(!service.delete_todo("nope").await.expect("delete"));
}

#[tokio::test]
async fn update_todo_requires_at_least_one_field() {
    let service = ready_service().await;
    let task = service.add_todo("buy milk").await.expect("add");

    match service.update_todo(&task.id, None, None).await {
        Err(ServiceError::Validation(_)) => {}
        other => panic!("expected Validation, got {:?}", other.map(|t| t.map(|t| t.text))),
    }
}

#[tokio::test]
async fn update_todo_applies_only_the_sent_fields() {
    let service = ready_service().await;
    let task = service.add_todo("buy milk").await.expect("add");

    let updated = service
        .update_todo(&task.id, None, Some(true))
        .await
        .expect("update")
        .expect("exists");
    assert!(updated.completed);
    assert_eq!(updated.text, "buy milk");
    assert_eq!(updated.created_at, task.created_at);

    let updated = service
        .update_todo(&task.id, Some("buy bread"), Some(false))
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.text, "buy bread");
    assert!(!updated.completed);
}

#[tokio::test]
async fn scenario_add_toggle_clear() {
    let service = ready_service().await;

    let a = service.add_todo("Task A").await.expect("add A");
    // Distinct creation instants even on a coarse clock.
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let b = service.add_todo("Task B").await.expect("add B");

    let texts: Vec<_> = service
        .get_all_todos()
        .await
        .expect("list")
        .into_iter()
        .map(|t| t.text)
        .collect();
    assert_eq!(texts, ["Task B", "Task A"], "newest first");

    let toggled = service
        .toggle_todo(&b.id)
        .await
        .expect("toggle")
        .expect("exists");
    assert!(toggled.completed);

    assert_eq!(service.clear_completed().await.expect("clear"), 1);
    let remaining = service.get_all_todos().await.expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, a.id);

    assert_eq!(service.clear_completed().await.expect("second clear"), 0);
}

#[tokio::test]
async fn health_reflects_initialization_state() {
    let service = TodoService::new(memory_config());
    assert!(!service.is_healthy().await, "unhealthy before initialize");

    service.initialize().await.expect("initialize");
    assert!(service.is_healthy().await);
}

#[tokio::test]
async fn close_resets_the_service_for_reinitialize() {
    let service = ready_service().await;
    service.add_todo("buy milk").await.expect("add");

    service.close().await.expect("close");
    match service.get_all_todos().await {
        Err(ServiceError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {:?}", other.map(|v| v.len())),
    }
    service.close().await.expect("close is idempotent");

    service.initialize().await.expect("reinitialize");
    assert!(service.is_healthy().await);
}

#[tokio::test]
async fn unknown_backend_surfaces_as_initialization_failure() {
    let service = TodoService::new(StoreConfig {
        backend: "postgres".into(),
        ..memory_config()
    });
    match service.initialize().await {
        Err(ServiceError::OperationFailed(_)) => {}
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}
