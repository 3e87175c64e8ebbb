//! CLI command tests against a temporary database

use std::sync::{Arc, Once};

use tempfile::TempDir;

use taplinker::config::init_config;
use taplinker::interfaces::cli::commands::{print_funnel, seed_demo_data};
use taplinker::storage::{SeaOrmStorage, StorageFactory, TagType};

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("cli_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = StorageFactory::create_with_url(&db_url)
        .await
        .expect("Failed to create storage");
    (storage, temp_dir)
}

#[tokio::test]
async fn test_seed_is_repeatable() {
    let (storage, _dir) = create_storage().await;

    seed_demo_data(storage.clone()).await.unwrap();
    seed_demo_data(storage.clone()).await.unwrap();

    let reps = storage.list_reps().await.unwrap();
    assert_eq!(reps.len(), 4);
    assert_eq!(reps[0].name, "Rep One");
    assert_eq!(reps[0].company.as_deref(), Some("Swany Roofing"));
    assert!(reps.iter().all(|r| r.is_active));

    let tags = storage.list_tags(Some(TagType::Rep)).await.unwrap();
    assert_eq!(tags.len(), 4);

    let tag = storage
        .find_tag_by_uid("test-rep-3")
        .await
        .unwrap()
        .expect("seeded tag");
    assert_eq!(tag.rep_id, Some(3));
    assert_eq!(tag.label.as_deref(), Some("Rep Three House Card"));
}

#[tokio::test]
async fn test_funnel_command_on_empty_database() {
    let (storage, _dir) = create_storage().await;

    print_funnel(storage.clone(), Some(7), None, false)
        .await
        .unwrap();
    print_funnel(storage, None, Some(1), true).await.unwrap();
}

#[tokio::test]
async fn test_funnel_command_rejects_zero_days() {
    let (storage, _dir) = create_storage().await;
    assert!(print_funnel(storage, Some(0), None, false).await.is_err());
}
