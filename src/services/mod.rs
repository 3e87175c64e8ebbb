//! Service layer for business logic
//!
//! Shared between the HTTP API and the CLI. Handlers stay thin and delegate
//! validation, attribution and aggregation to the services below.

pub mod best_effort;
mod deal_page_service;
pub mod event_recorder;
pub mod funnel;
mod job_service;
mod lead_service;
pub mod notifier;
mod rep_service;
mod tag_service;
pub mod tap_resolver;

use std::sync::Arc;
use std::time::Duration;

pub use best_effort::{best_effort, spawn_best_effort};
pub use deal_page_service::DealPageService;
pub use event_recorder::{EventInput, EventRecorder, parse_event_type};
pub use funnel::{DailyPoint, FunnelAggregator, FunnelQuery, FunnelReport, FunnelSummary};
pub use job_service::{JobService, validate_job};
pub use lead_service::*;
pub use notifier::{HttpEmailNotifier, LeadNotifier, NoopNotifier, notifier_from_config};
pub use rep_service::*;
pub use tag_service::*;
pub use tap_resolver::{TapContext, TapResolution, TapResolver, parse_rep_id};

use crate::config::StaticConfig;
use crate::storage::SeaOrmStorage;

/// All services wired against one storage handle
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub recorder: Arc<EventRecorder>,
    pub tap_resolver: Arc<TapResolver>,
    pub funnel: Arc<FunnelAggregator>,
    pub leads: Arc<LeadService>,
    pub reps: Arc<RepService>,
    pub tags: Arc<TagService>,
    pub jobs: Arc<JobService>,
    pub deal_page: Arc<DealPageService>,
}

impl AppServices {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        config: &StaticConfig,
        notifier: Arc<dyn LeadNotifier>,
    ) -> Self {
        let recorder = Arc::new(EventRecorder::new(
            storage.clone(),
            Duration::from_millis(config.analytics.event_write_timeout_ms),
        ));
        let funnel = Arc::new(FunnelAggregator::new(
            storage.clone(),
            config.analytics.default_days,
            config.analytics.max_days,
        ));
        // 给 HTTP 超时留出余量
        let notify_timeout = Duration::from_secs(config.notify.timeout_secs.max(1) + 5);

        Self {
            tap_resolver: Arc::new(TapResolver::new(storage.clone(), recorder.clone())),
            leads: Arc::new(LeadService::new(
                storage.clone(),
                recorder.clone(),
                notifier,
                notify_timeout,
            )),
            reps: Arc::new(RepService::new(storage.clone(), funnel.clone())),
            tags: Arc::new(TagService::new(storage.clone())),
            jobs: Arc::new(JobService::new(storage.clone())),
            deal_page: Arc::new(DealPageService::new(storage.clone())),
            recorder,
            funnel,
            storage,
        }
    }

    /// 使用全局配置与配置中的通知实现
    pub fn from_config(storage: Arc<SeaOrmStorage>) -> Self {
        let config = crate::config::get_config();
        let notifier = notifier_from_config(&config.notify);
        Self::new(storage, &config, notifier)
    }
}
