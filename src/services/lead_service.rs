//! Lead capture and status workflow
//!
//! Provides the business logic behind `POST /leads` and the admin lead
//! endpoints. Status transitions are unconstrained: any of the six states can
//! follow any other.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::best_effort::spawn_best_effort;
use super::event_recorder::EventRecorder;
use super::notifier::LeadNotifier;
use crate::errors::{Result, TaplinkerError};
use crate::storage::{
    EventMeta, EventType, Lead, LeadFilter, LeadPatch, LeadStatus, LeadUpdate, LeadWithRep,
    NewLead, RepSummary, SeaOrmStorage,
};

/// Default page size for lead listing
pub const DEFAULT_LEAD_LIMIT: u64 = 100;
/// Upper bound for a single page
pub const MAX_LEAD_LIMIT: u64 = 1000;
/// Minimum trimmed length of a lead name
const MIN_NAME_LEN: usize = 2;

// ============ Request DTOs ============

/// Raw lead form submission
///
/// `repId` arrives either as a JSON number or as a numeric string. Text
/// fields accept any scalar; numbers are stringified (a numeric `zip` or
/// `phone` is common from form serializers).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    #[serde(default)]
    pub rep_id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub zip: Option<Value>,
    #[serde(default)]
    pub notes: Option<Value>,
}

/// Admin listing query (status is validated here, not by serde)
#[derive(Debug, Clone, Default)]
pub struct LeadListQuery {
    pub rep_id: Option<i32>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

// ============ Validation ============

/// 标量转字符串；null、false、0 与对象/数组视为未填写
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn trimmed(value: Option<Value>) -> Option<String> {
    coerce_text(value.as_ref())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts a positive integer or a string holding one
pub fn parse_input_rep_id(raw: Option<&Value>) -> Result<i32> {
    let invalid = || TaplinkerError::invalid_lead("Invalid repId");

    let id = match raw {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    i32::try_from(id).ok().filter(|id| *id > 0).ok_or_else(invalid)
}

/// Validate a form submission into an insertable lead
pub fn validate_lead(
    input: LeadInput,
    user_agent: Option<String>,
    ip: Option<String>,
) -> Result<NewLead> {
    let rep_id = parse_input_rep_id(input.rep_id.as_ref())?;

    let name = trimmed(input.name).unwrap_or_default();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(TaplinkerError::invalid_lead("Name is required"));
    }

    let phone = trimmed(input.phone);
    let email = trimmed(input.email);
    if phone.is_none() && email.is_none() {
        return Err(TaplinkerError::invalid_lead("Phone or email required"));
    }

    Ok(NewLead {
        rep_id,
        name,
        phone,
        email,
        address: trimmed(input.address),
        city: trimmed(input.city),
        state: trimmed(input.state),
        zip: trimmed(input.zip),
        notes: trimmed(input.notes),
        user_agent,
        ip,
    })
}

/// Exact-case status parsing
pub fn parse_status(raw: &str) -> Result<LeadStatus> {
    LeadStatus::from_str(raw)
        .map_err(|_| TaplinkerError::validation(format!("Invalid status: {}", raw)))
}

// ============ LeadService Implementation ============

pub struct LeadService {
    storage: Arc<SeaOrmStorage>,
    recorder: Arc<EventRecorder>,
    notifier: Arc<dyn LeadNotifier>,
    notify_timeout: Duration,
}

impl LeadService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        recorder: Arc<EventRecorder>,
        notifier: Arc<dyn LeadNotifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            recorder,
            notifier,
            notify_timeout,
        }
    }

    /// Capture a lead from the profile form
    ///
    /// Validation and the rep check happen before any write. The SUBMIT event
    /// and the notification are best-effort; only the lead insert can fail
    /// the request after validation.
    pub async fn capture_lead(
        &self,
        input: LeadInput,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> Result<Lead> {
        let new_lead = validate_lead(input, user_agent, ip)?;

        let rep = match self.storage.get_rep(new_lead.rep_id).await? {
            Some(rep) if rep.is_active => rep,
            _ => return Err(TaplinkerError::rep_not_found("Rep not found")),
        };

        let user_agent = new_lead.user_agent.clone();
        let ip = new_lead.ip.clone();
        let lead = self.storage.insert_lead(new_lead).await?;

        let mut meta = EventMeta::new();
        meta.insert("leadId".to_string(), json!(lead.id));
        self.recorder
            .record_typed(rep.id, EventType::Submit, meta, user_agent, ip)
            .await;

        let notifier = Arc::clone(&self.notifier);
        let notify_lead = lead.clone();
        spawn_best_effort(
            format!("notify lead {}", lead.id),
            self.notify_timeout,
            async move { notifier.notify(&notify_lead, &rep).await },
        );

        info!("LeadService: captured lead {} for rep {}", lead.id, lead.rep_id);
        Ok(lead)
    }

    pub async fn get_lead(&self, id: &str) -> Result<Lead> {
        self.storage
            .get_lead(id)
            .await?
            .ok_or_else(|| TaplinkerError::not_found("Lead not found"))
    }

    /// Overwrite the status of a lead
    pub async fn update_status(&self, id: &str, status: &str) -> Result<Lead> {
        let status = parse_status(status)?;
        let lead = self
            .storage
            .update_lead(id, LeadUpdate::status_only(status))
            .await?
            .ok_or_else(|| TaplinkerError::not_found("Lead not found"))?;

        debug!("Lead {} moved to {}", lead.id, lead.status);
        Ok(lead)
    }

    /// Apply an admin patch (allow-listed fields only)
    pub async fn patch_lead(&self, id: &str, mut patch: LeadPatch) -> Result<Lead> {
        let status = patch.status.take().map(|s| parse_status(&s)).transpose()?;
        self.storage
            .update_lead(id, LeadUpdate::from_patch(patch, status))
            .await?
            .ok_or_else(|| TaplinkerError::not_found("Lead not found"))
    }

    /// 附带 rep 的 id 与名字（rep 已被删除时为 None）
    pub async fn with_rep(&self, lead: Lead) -> Result<LeadWithRep> {
        let rep = self
            .storage
            .get_rep(lead.rep_id)
            .await?
            .map(|rep| RepSummary {
                id: rep.id,
                name: rep.name,
            });
        Ok(LeadWithRep { lead, rep })
    }

    /// Newest-first listing with rep summaries and the filtered total
    pub async fn list_leads(&self, query: LeadListQuery) -> Result<(Vec<LeadWithRep>, u64)> {
        let status = query.status.as_deref().map(parse_status).transpose()?;
        let filter = LeadFilter {
            rep_id: query.rep_id,
            status,
            limit: query.limit.unwrap_or(DEFAULT_LEAD_LIMIT).min(MAX_LEAD_LIMIT),
            skip: query.skip.unwrap_or(0),
        };

        let (leads, total) = self.storage.list_leads(&filter).await?;
        let reps: HashMap<i32, RepSummary> = self
            .storage
            .list_reps()
            .await?
            .into_iter()
            .map(|rep| {
                (
                    rep.id,
                    RepSummary {
                        id: rep.id,
                        name: rep.name,
                    },
                )
            })
            .collect();

        let leads = leads
            .into_iter()
            .map(|lead| {
                let rep = reps.get(&lead.rep_id).cloned();
                LeadWithRep { lead, rep }
            })
            .collect();
        Ok((leads, total))
    }
}
