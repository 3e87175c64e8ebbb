//! Entity Model <-> 领域模型 转换

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{
    DealPage, Event, EventMeta, EventType, Job, Lead, LeadStatus, NewEvent, NewJob, NewLead,
    NewRep, NewTag, Rep, Tag, TagType,
};
use migration::entities::{deal_page, event, job, lead, rep, tag};

/// 写入 leads.source 的固定值
pub const LEAD_SOURCE: &str = "nfc";

/// 去掉首尾空白，空字符串视为 None
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============ Rep ============

pub fn model_to_rep(model: rep::Model) -> Rep {
    Rep {
        id: model.id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        title: model.title,
        company: model.company,
        bio: model.bio,
        photo_url: model.photo_url,
        cal_link: model.cal_link,
        is_active: model.is_active,
        redirect_url: model.redirect_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn new_rep_to_active_model(rep: NewRep, now: DateTime<Utc>) -> rep::ActiveModel {
    rep::ActiveModel {
        id: Set(rep.id),
        name: Set(rep.name.trim().to_string()),
        phone: Set(normalize_optional(rep.phone)),
        email: Set(normalize_optional(rep.email)),
        title: Set(normalize_optional(rep.title)),
        company: Set(normalize_optional(rep.company)),
        bio: Set(normalize_optional(rep.bio)),
        photo_url: Set(normalize_optional(rep.photo_url)),
        cal_link: Set(normalize_optional(rep.cal_link)),
        is_active: Set(true),
        redirect_url: Set(normalize_optional(rep.redirect_url)),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

// ============ Event ============

/// meta 列解析；历史数据中的非对象值包成 `{"value": v}`
pub fn parse_meta(raw: Option<&str>) -> Result<EventMeta> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(EventMeta::new());
    };
    let value: serde_json::Value = serde_json::from_str(raw)?;
    Ok(meta_from_value(value))
}

/// 任意 JSON 值 -> 事件元数据
pub fn meta_from_value(value: serde_json::Value) -> EventMeta {
    match value {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => EventMeta::new(),
        other => {
            let mut map = EventMeta::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

pub fn model_to_event(model: event::Model) -> Result<Event> {
    let event_type = EventType::from_str(&model.event_type).map_err(|_| {
        TaplinkerError::serialization(format!("未知的事件类型: {}", model.event_type))
    })?;
    Ok(Event {
        id: model.id,
        rep_id: model.rep_id,
        event_type,
        meta: parse_meta(model.meta.as_deref())?,
        user_agent: model.user_agent,
        ip: model.ip,
        created_at: model.created_at,
    })
}

pub fn new_event_to_active_model(
    event: &NewEvent,
    now: DateTime<Utc>,
) -> Result<event::ActiveModel> {
    let meta = if event.meta.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&event.meta)?)
    };
    Ok(event::ActiveModel {
        id: NotSet,
        rep_id: Set(event.rep_id),
        event_type: Set(event.event_type.as_ref().to_string()),
        meta: Set(meta),
        user_agent: Set(event.user_agent.clone()),
        ip: Set(event.ip.clone()),
        created_at: Set(now),
    })
}

// ============ Lead ============

pub fn model_to_lead(model: lead::Model) -> Result<Lead> {
    let status = LeadStatus::from_str(&model.status)
        .map_err(|_| TaplinkerError::serialization(format!("未知的线索状态: {}", model.status)))?;
    Ok(Lead {
        id: model.id,
        rep_id: model.rep_id,
        name: model.name,
        phone: model.phone,
        email: model.email,
        address: model.address,
        city: model.city,
        state: model.state,
        zip: model.zip,
        notes: model.notes,
        status,
        source: model.source,
        user_agent: model.user_agent,
        ip: model.ip,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn new_lead_to_active_model(
    id: String,
    lead: NewLead,
    now: DateTime<Utc>,
) -> lead::ActiveModel {
    lead::ActiveModel {
        id: Set(id),
        rep_id: Set(lead.rep_id),
        name: Set(lead.name),
        phone: Set(lead.phone),
        email: Set(lead.email),
        address: Set(lead.address),
        city: Set(lead.city),
        state: Set(lead.state),
        zip: Set(lead.zip),
        notes: Set(lead.notes),
        status: Set(LeadStatus::New.as_ref().to_string()),
        source: Set(LEAD_SOURCE.to_string()),
        user_agent: Set(lead.user_agent),
        ip: Set(lead.ip),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

// ============ Tag ============

pub fn model_to_tag(model: tag::Model) -> Result<Tag> {
    let tag_type = TagType::from_str(&model.tag_type)
        .map_err(|_| TaplinkerError::serialization(format!("未知的 tag 类型: {}", model.tag_type)))?;
    Ok(Tag {
        id: model.id,
        uid: model.uid,
        label: model.label,
        tag_type,
        is_locked: model.is_locked,
        is_active: model.is_active,
        rep_id: model.rep_id,
        job_id: model.job_id,
        notes: model.notes,
        created_at: model.created_at,
    })
}

pub fn new_tag_to_active_model(id: String, tag: NewTag, now: DateTime<Utc>) -> tag::ActiveModel {
    tag::ActiveModel {
        id: Set(id),
        uid: Set(normalize_optional(tag.uid)),
        label: Set(normalize_optional(tag.label)),
        tag_type: Set(tag.tag_type.as_ref().to_string()),
        is_locked: Set(tag.is_locked),
        is_active: Set(true),
        rep_id: Set(tag.rep_id),
        job_id: Set(tag.job_id),
        notes: Set(normalize_optional(tag.notes)),
        created_at: Set(now),
    }
}

// ============ Job ============

pub fn model_to_job(model: job::Model) -> Result<Job> {
    let photo_urls: Vec<String> = if model.photo_urls.is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&model.photo_urls)?
    };
    Ok(Job {
        id: model.id,
        job_number: model.job_number,
        homeowner_name: model.homeowner_name,
        address: model.address,
        city: model.city,
        state: model.state,
        zip: model.zip,
        phone: model.phone,
        email: model.email,
        completion_date: model.completion_date,
        shingle_type: model.shingle_type,
        shingle_color: model.shingle_color,
        manufacturer: model.manufacturer,
        warranty_years: model.warranty_years,
        warranty_code: model.warranty_code,
        rep_id: model.rep_id,
        notes: model.notes,
        drone_video_url: model.drone_video_url,
        photo_urls,
        is_active: model.is_active,
        created_at: model.created_at,
    })
}

pub fn new_job_to_active_model(
    id: String,
    job: NewJob,
    now: DateTime<Utc>,
) -> Result<job::ActiveModel> {
    Ok(job::ActiveModel {
        id: Set(id),
        job_number: Set(normalize_optional(job.job_number)),
        homeowner_name: Set(job.homeowner_name.trim().to_string()),
        address: Set(job.address.trim().to_string()),
        city: Set(normalize_optional(job.city)),
        state: Set(normalize_optional(job.state)),
        zip: Set(normalize_optional(job.zip)),
        phone: Set(normalize_optional(job.phone)),
        email: Set(normalize_optional(job.email)),
        completion_date: Set(job.completion_date),
        shingle_type: Set(normalize_optional(job.shingle_type)),
        shingle_color: Set(normalize_optional(job.shingle_color)),
        manufacturer: Set(normalize_optional(job.manufacturer)),
        warranty_years: Set(job.warranty_years),
        warranty_code: Set(normalize_optional(job.warranty_code)),
        rep_id: Set(job.rep_id),
        notes: Set(normalize_optional(job.notes)),
        drone_video_url: Set(normalize_optional(job.drone_video_url)),
        photo_urls: Set(serde_json::to_string(&job.photo_urls)?),
        is_active: Set(true),
        created_at: Set(now),
    })
}

// ============ Deal page ============

pub fn model_to_deal_page(model: deal_page::Model) -> DealPage {
    DealPage {
        id: model.id,
        is_live: model.is_live,
        badge: model.badge,
        headline: model.headline,
        subheadline: model.subheadline,
        body: model.body,
        cta_text: model.cta_text,
        cta_url: model.cta_url,
        company_name: model.company_name,
        logo_url: model.logo_url,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_from_value_wraps_scalars() {
        let meta = meta_from_value(json!("hello"));
        assert_eq!(meta.get("value"), Some(&json!("hello")));

        let meta = meta_from_value(json!([1, 2]));
        assert_eq!(meta.get("value"), Some(&json!([1, 2])));

        assert!(meta_from_value(json!(null)).is_empty());

        let meta = meta_from_value(json!({"path": "/tap/7"}));
        assert_eq!(meta.get("path"), Some(&json!("/tap/7")));
    }

    #[test]
    fn test_parse_meta_handles_missing_column() {
        assert!(parse_meta(None).unwrap().is_empty());
        assert!(parse_meta(Some("")).unwrap().is_empty());
        assert!(parse_meta(Some("{not json")).is_err());
    }

    #[test]
    fn test_event_round_trip_through_active_model() {
        let mut meta = EventMeta::new();
        meta.insert("redirected".to_string(), json!(true));
        let new_event = NewEvent {
            rep_id: 7,
            event_type: EventType::Tap,
            meta,
            user_agent: Some("curl/8".to_string()),
            ip: None,
        };
        let now = Utc::now();
        let active = new_event_to_active_model(&new_event, now).unwrap();

        let model = event::Model {
            id: 1,
            rep_id: active.rep_id.unwrap(),
            event_type: active.event_type.unwrap(),
            meta: active.meta.unwrap(),
            user_agent: active.user_agent.unwrap(),
            ip: active.ip.unwrap(),
            created_at: active.created_at.unwrap(),
        };
        assert_eq!(model.event_type, "TAP");

        let event = model_to_event(model).unwrap();
        assert_eq!(event.event_type, EventType::Tap);
        assert_eq!(event.meta.get("redirected"), Some(&json!(true)));
        assert_eq!(event.created_at, now);
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  a ".to_string())), Some("a".to_string()));
        assert_eq!(normalize_optional(Some("   ".to_string())), None);
        assert_eq!(normalize_optional(None), None);
    }
}
