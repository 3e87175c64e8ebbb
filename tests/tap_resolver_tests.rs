//! Tap resolution integration tests

use std::sync::{Arc, Once};
use std::time::Duration;

use sea_orm::ConnectionTrait;
use serde_json::json;
use tempfile::TempDir;

use taplinker::config::init_config;
use taplinker::errors::TaplinkerError;
use taplinker::services::{EventInput, EventRecorder, TapContext, TapResolution, TapResolver};
use taplinker::storage::{EventType, NewRep, RepPatch, SeaOrmStorage, StorageFactory};

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn setup() -> (Arc<SeaOrmStorage>, TapResolver, TempDir) {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("tap_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = StorageFactory::create_with_url(&db_url)
        .await
        .expect("Failed to create storage");

    let recorder = Arc::new(EventRecorder::new(storage.clone(), Duration::from_secs(5)));
    let resolver = TapResolver::new(storage.clone(), recorder);
    (storage, resolver, temp_dir)
}

fn ctx(path: &str) -> TapContext {
    TapContext {
        path: path.to_string(),
        user_agent: Some("Mozilla/5.0 (iPhone)".to_string()),
        ip: Some("203.0.113.9".to_string()),
    }
}

#[tokio::test]
async fn test_redirect_records_exactly_one_tap() {
    let (storage, resolver, _dir) = setup().await;
    storage
        .insert_rep(NewRep {
            id: 7,
            name: "Rep Seven".to_string(),
            redirect_url: Some("https://example.com/deal".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let resolution = resolver.resolve("7", ctx("/tap/7")).await.unwrap();
    assert_eq!(
        resolution,
        TapResolution::Redirect {
            rep_id: 7,
            url: "https://example.com/deal".to_string(),
        }
    );

    let events = storage.list_events_for_rep(7, 10).await.unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event_type, EventType::Tap);
    assert_eq!(event.meta.get("redirected"), Some(&json!(true)));
    assert_eq!(event.meta.get("path"), Some(&json!("/tap/7")));
    assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0 (iPhone)"));
    assert_eq!(event.ip.as_deref(), Some("203.0.113.9"));
}

#[tokio::test]
async fn test_clearing_redirect_falls_back_to_profile() {
    let (storage, resolver, _dir) = setup().await;
    storage
        .insert_rep(NewRep {
            id: 8,
            name: "Rep Eight".to_string(),
            redirect_url: Some("https://example.com/deal".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    storage
        .update_rep(
            8,
            RepPatch {
                redirect_url: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    match resolver.resolve("8", ctx("/r/8")).await.unwrap() {
        TapResolution::Profile(rep) => {
            assert_eq!(rep.id, 8);
            assert!(rep.redirect_url.is_none());
        }
        other => panic!("expected profile, got {:?}", other),
    }

    // 个人页分支不在服务端写 TAP
    assert_eq!(storage.count_events_for_rep(8).await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_redirect_renders_profile() {
    let (storage, resolver, _dir) = setup().await;
    storage
        .insert_rep(NewRep {
            id: 9,
            name: "Rep Nine".to_string(),
            redirect_url: Some("   ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(matches!(
        resolver.resolve("9", ctx("/tap/9")).await.unwrap(),
        TapResolution::Profile(_)
    ));
}

#[tokio::test]
async fn test_unknown_malformed_and_inactive_are_not_found() {
    let (storage, resolver, _dir) = setup().await;
    storage
        .insert_rep(NewRep {
            id: 5,
            name: "Rep Five".to_string(),
            redirect_url: Some("https://example.com/deal".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    storage
        .update_rep(
            5,
            RepPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for raw in ["5", "404", "abc", "0", "-1", ""] {
        let err = resolver.resolve(raw, ctx("/tap/x")).await.unwrap_err();
        assert!(
            matches!(err, TaplinkerError::NotFound(_)),
            "{} should be not found",
            raw
        );
    }

    assert_eq!(storage.count_events_for_rep(5).await.unwrap(), 0);
}

#[tokio::test]
async fn test_redirect_change_takes_effect_immediately() {
    let (storage, resolver, _dir) = setup().await;
    storage
        .insert_rep(NewRep {
            id: 11,
            name: "Rep Eleven".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(matches!(
        resolver.resolve("11", ctx("/tap/11")).await.unwrap(),
        TapResolution::Profile(_)
    ));

    storage
        .update_rep(
            11,
            RepPatch {
                redirect_url: Some(Some("https://example.com/spring".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    match resolver.resolve("11", ctx("/tap/11")).await.unwrap() {
        TapResolution::Redirect { url, .. } => assert_eq!(url, "https://example.com/spring"),
        other => panic!("expected redirect, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_survives_event_store_failure() {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("tap_broken.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = StorageFactory::create_with_url(&db_url)
        .await
        .expect("Failed to create storage");
    storage
        .insert_rep(NewRep {
            id: 9,
            name: "Rep Nine".to_string(),
            redirect_url: Some("https://example.com/deal".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    storage
        .get_db()
        .execute_unprepared("DROP TABLE events")
        .await
        .unwrap();
    assert!(storage.list_events_for_rep(9, 10).await.is_err());

    let recorder = Arc::new(EventRecorder::new(storage.clone(), Duration::from_secs(5)));
    let resolver = TapResolver::new(storage.clone(), recorder.clone());

    // 事件写入失败不影响跳转
    let resolution = resolver.resolve("9", ctx("/tap/9")).await.unwrap();
    assert_eq!(
        resolution,
        TapResolution::Redirect {
            rep_id: 9,
            url: "https://example.com/deal".to_string(),
        }
    );

    // 外部提交的事件同样吞掉存储错误
    recorder
        .record(EventInput {
            rep_id: 9,
            event_type: "view".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    // 校验错误仍然返回
    assert!(
        recorder
            .record(EventInput {
                rep_id: 9,
                event_type: "CLICK".to_string(),
                ..Default::default()
            })
            .await
            .is_err()
    );
}
