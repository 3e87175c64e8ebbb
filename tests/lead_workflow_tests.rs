//! Lead capture and status workflow integration tests

use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use strum::IntoEnumIterator;
use tempfile::TempDir;
use tokio::sync::Mutex;

use taplinker::config::init_config;
use taplinker::errors::{Result, TaplinkerError};
use taplinker::services::{
    EventRecorder, LeadInput, LeadListQuery, LeadNotifier, LeadService,
};
use taplinker::storage::{
    EventType, Lead, LeadPatch, LeadStatus, NewRep, Rep, RepPatch, SeaOrmStorage, StorageFactory,
};

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

/// Records every notification instead of sending it
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, i32)>>,
    fail: bool,
}

#[async_trait]
impl LeadNotifier for RecordingNotifier {
    async fn notify(&self, lead: &Lead, rep: &Rep) -> Result<()> {
        self.sent.lock().await.push((lead.id.clone(), rep.id));
        if self.fail {
            return Err(TaplinkerError::notification("mail provider returned 500"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct TestEnv {
    storage: Arc<SeaOrmStorage>,
    service: LeadService,
    notifier: Arc<RecordingNotifier>,
    _dir: TempDir,
}

async fn setup_with(notifier: RecordingNotifier) -> TestEnv {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("lead_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = StorageFactory::create_with_url(&db_url)
        .await
        .expect("Failed to create storage");

    storage
        .insert_rep(NewRep {
            id: 3,
            name: "Rep Three".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let notifier = Arc::new(notifier);
    let recorder = Arc::new(EventRecorder::new(storage.clone(), Duration::from_secs(5)));
    let service = LeadService::new(
        storage.clone(),
        recorder,
        notifier.clone(),
        Duration::from_secs(5),
    );

    TestEnv {
        storage,
        service,
        notifier,
        _dir: temp_dir,
    }
}

async fn setup() -> TestEnv {
    setup_with(RecordingNotifier::default()).await
}

fn form(rep_id: serde_json::Value) -> LeadInput {
    LeadInput {
        rep_id: Some(rep_id),
        name: Some(json!("Jane Doe")),
        phone: Some(json!("555-0100")),
        address: Some(json!("12 Elm St")),
        ..Default::default()
    }
}

/// 通知在独立任务中执行，轮询等待
async fn wait_for_notifications(notifier: &RecordingNotifier, expected: usize) {
    for _ in 0..50 {
        if notifier.sent.lock().await.len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_capture_lead_records_submit_and_notifies() {
    let env = setup().await;

    let lead = env
        .service
        .capture_lead(
            form(json!("3")),
            Some("Mozilla/5.0".to_string()),
            Some("198.51.100.4".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(lead.rep_id, 3);
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.address.as_deref(), Some("12 Elm St"));
    assert_eq!(lead.ip.as_deref(), Some("198.51.100.4"));

    let events = env.storage.list_events_for_rep(3, 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::Submit);
    assert_eq!(events[0].meta.get("leadId"), Some(&json!(lead.id)));

    wait_for_notifications(&env.notifier, 1).await;
    let sent = env.notifier.sent.lock().await;
    assert_eq!(sent.as_slice(), &[(lead.id.clone(), 3)]);
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_capture() {
    let env = setup_with(RecordingNotifier {
        fail: true,
        ..Default::default()
    })
    .await;

    let lead = env
        .service
        .capture_lead(form(json!(3)), None, None)
        .await
        .unwrap();

    wait_for_notifications(&env.notifier, 1).await;
    assert_eq!(env.notifier.sent.lock().await.len(), 1);
    assert!(env.storage.get_lead(&lead.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_capture_lead_validation_happens_before_writes() {
    let env = setup().await;

    let mut no_contact = form(json!(3));
    no_contact.phone = None;
    let err = env
        .service
        .capture_lead(no_contact, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TaplinkerError::InvalidLead(_)));

    let err = env
        .service
        .capture_lead(form(json!(99)), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TaplinkerError::RepNotFound(_)));

    let (_, total) = env
        .service
        .list_leads(LeadListQuery::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert_eq!(env.storage.count_events_for_rep(3).await.unwrap(), 0);
    assert!(env.notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_inactive_rep_rejects_leads() {
    let env = setup().await;
    env.storage
        .update_rep(
            3,
            RepPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = env
        .service
        .capture_lead(form(json!(3)), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TaplinkerError::RepNotFound(_)));
}

#[tokio::test]
async fn test_update_status_accepts_any_transition() {
    let env = setup().await;
    let lead = env
        .service
        .capture_lead(form(json!(3)), None, None)
        .await
        .unwrap();

    // WON → NEW 之类的回退同样允许
    for status in LeadStatus::iter().chain(LeadStatus::iter().rev()) {
        let updated = env
            .service
            .update_status(&lead.id, status.as_ref())
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    let err = env
        .service
        .update_status(&lead.id, "ARCHIVED")
        .await
        .unwrap_err();
    assert!(matches!(err, TaplinkerError::Validation(_)));

    let err = env
        .service
        .update_status("missing-lead", "WON")
        .await
        .unwrap_err();
    assert!(matches!(err, TaplinkerError::NotFound(_)));
}

#[tokio::test]
async fn test_patch_lead_allow_list() {
    let env = setup().await;
    let lead = env
        .service
        .capture_lead(form(json!(3)), None, None)
        .await
        .unwrap();

    let patched = env
        .service
        .patch_lead(
            &lead.id,
            LeadPatch {
                status: Some("CONTACTED".to_string()),
                notes: Some(Some("Called back, booked Tuesday".to_string())),
                phone: Some(None),
                email: Some(Some("jane@example.com".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.status, LeadStatus::Contacted);
    assert_eq!(patched.notes.as_deref(), Some("Called back, booked Tuesday"));
    assert_eq!(patched.phone, None);
    assert_eq!(patched.email.as_deref(), Some("jane@example.com"));
    assert_eq!(patched.address.as_deref(), Some("12 Elm St"));

    let err = env
        .service
        .patch_lead(
            &lead.id,
            LeadPatch {
                status: Some("contacted".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TaplinkerError::Validation(_)));
}

#[tokio::test]
async fn test_list_leads_filters_and_paginates() {
    let env = setup().await;
    env.storage
        .insert_rep(NewRep {
            id: 4,
            name: "Rep Four".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut ids = Vec::new();
    for rep_id in [3, 3, 4] {
        let lead = env
            .service
            .capture_lead(form(json!(rep_id)), None, None)
            .await
            .unwrap();
        ids.push(lead.id);
        // created_at 精度足够区分先后
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    env.service.update_status(&ids[0], "WON").await.unwrap();

    let (leads, total) = env
        .service
        .list_leads(LeadListQuery::default())
        .await
        .unwrap();
    assert_eq!(total, 3);
    // 新的在前
    assert_eq!(leads[0].lead.id, ids[2]);
    assert_eq!(leads[0].rep.as_ref().map(|r| r.name.as_str()), Some("Rep Four"));

    let (leads, total) = env
        .service
        .list_leads(LeadListQuery {
            rep_id: Some(3),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(leads.iter().all(|l| l.lead.rep_id == 3));

    let (leads, total) = env
        .service
        .list_leads(LeadListQuery {
            status: Some("WON".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(leads[0].lead.id, ids[0]);

    let (leads, total) = env
        .service
        .list_leads(LeadListQuery {
            limit: Some(1),
            skip: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].lead.id, ids[1]);
}
