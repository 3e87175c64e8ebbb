//! 领域模型
//!
//! 与数据库 entity 分离：entity 使用字符串列保存枚举与 JSON，
//! 这里是经过解析后的强类型结构，同时也是 HTTP 层的序列化形状（camelCase）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 事件元数据：任意 JSON 对象
pub type EventMeta = Map<String, Value>;

// ============ 枚举 ============

/// 事件类型
///
/// 解析时大小写不敏感，存储与序列化统一为大写。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EventType {
    Tap,
    View,
    Submit,
    ContactSave,
}

/// 线索状态
///
/// 状态之间可任意转换，没有约束。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    InspectionBooked,
    EstimateSent,
    Won,
    Lost,
}

/// NFC tag 类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TagType {
    #[default]
    Rep,
    Job,
    Tradeshow,
    Static,
}

// ============ Rep ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rep {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub cal_link: Option<String>,
    pub is_active: bool,
    pub redirect_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rep {
    /// 非空的 redirectUrl（空白字符串视为未设置）
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// 创建 Rep（id 由调用方指定）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRep {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub cal_link: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Rep 局部更新
///
/// 只有列出的字段可以修改；外层 None 表示未提供，`Some(None)` 表示清空。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cal_link: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub redirect_url: Option<Option<String>>,
}

/// Rep 全量统计（不限时间窗口）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepStats {
    pub taps: u64,
    pub submits: u64,
    pub leads: u64,
    pub conversion_rate: String,
}

// ============ Event ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub rep_id: i32,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub meta: EventMeta,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的事件
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub rep_id: i32,
    pub event_type: EventType,
    pub meta: EventMeta,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// (rep_id, type) 分组计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepTypeCount {
    pub rep_id: i32,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub count: u64,
}

// ============ Lead ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub rep_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub source: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 已校验、待写入的线索
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewLead {
    pub rep_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub notes: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// 线索局部更新（status 在 service 层校验后再写入）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub zip: Option<Option<String>>,
}

/// 线索列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub rep_id: Option<i32>,
    pub status: Option<LeadStatus>,
    pub limit: u64,
    pub skip: u64,
}

/// 列表中附带的 rep 摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadWithRep {
    #[serde(flatten)]
    pub lead: Lead,
    pub rep: Option<RepSummary>,
}

// ============ Tag ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub uid: Option<String>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub is_locked: bool,
    pub is_active: bool,
    pub rep_id: Option<i32>,
    pub job_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTag {
    pub uid: Option<String>,
    pub label: Option<String>,
    pub tag_type: TagType,
    pub is_locked: bool,
    pub rep_id: Option<i32>,
    pub job_id: Option<String>,
    pub notes: Option<String>,
}

// ============ Job ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub job_number: Option<String>,
    pub homeowner_name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub completion_date: Option<DateTime<Utc>>,
    pub shingle_type: Option<String>,
    pub shingle_color: Option<String>,
    pub manufacturer: Option<String>,
    pub warranty_years: Option<i32>,
    pub warranty_code: Option<String>,
    pub rep_id: Option<i32>,
    pub notes: Option<String>,
    pub drone_video_url: Option<String>,
    pub photo_urls: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[serde(default)]
    pub job_number: Option<String>,
    #[serde(default)]
    pub homeowner_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shingle_type: Option<String>,
    #[serde(default)]
    pub shingle_color: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub warranty_years: Option<i32>,
    #[serde(default)]
    pub warranty_code: Option<String>,
    #[serde(default)]
    pub rep_id: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub drone_video_url: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

// ============ Deal page ============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealPage {
    pub id: i32,
    pub is_live: bool,
    pub badge: Option<String>,
    pub headline: Option<String>,
    pub subheadline: Option<String>,
    pub body: Option<String>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealPagePatch {
    #[serde(default)]
    pub is_live: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub badge: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub headline: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub subheadline: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cta_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cta_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub company_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

/// 区分 "字段缺失" 与 "显式 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_event_type_parse_is_case_insensitive() {
        assert_eq!(EventType::from_str("tap").unwrap(), EventType::Tap);
        assert_eq!(EventType::from_str("View").unwrap(), EventType::View);
        assert_eq!(
            EventType::from_str("contact_save").unwrap(),
            EventType::ContactSave
        );
        assert!(EventType::from_str("CLICK").is_err());
        assert!(EventType::from_str("").is_err());
    }

    #[test]
    fn test_event_type_has_exactly_four_values() {
        let names: Vec<String> = EventType::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["TAP", "VIEW", "SUBMIT", "CONTACT_SAVE"]);
    }

    #[test]
    fn test_lead_status_parse_is_exact() {
        for status in LeadStatus::iter() {
            assert_eq!(LeadStatus::from_str(status.as_ref()).unwrap(), status);
        }
        assert_eq!(
            LeadStatus::InspectionBooked.as_ref(),
            "INSPECTION_BOOKED"
        );
        assert!(LeadStatus::from_str("ARCHIVED").is_err());
        assert_eq!(LeadStatus::default(), LeadStatus::New);
    }

    #[test]
    fn test_tag_type_defaults_to_rep() {
        assert_eq!(TagType::default(), TagType::Rep);
        assert_eq!(TagType::from_str("tradeshow").unwrap(), TagType::Tradeshow);
        assert_eq!(TagType::Static.to_string(), "STATIC");
    }

    #[test]
    fn test_rep_patch_distinguishes_null_from_missing() {
        let patch: RepPatch =
            serde_json::from_str(r#"{"redirectUrl": null, "name": "New", "id": 99}"#).unwrap();
        assert_eq!(patch.redirect_url, Some(None));
        assert_eq!(patch.name.as_deref(), Some("New"));
        assert_eq!(patch.phone, None);
        assert_eq!(patch.is_active, None);
    }

    #[test]
    fn test_redirect_target_ignores_blank() {
        let now = Utc::now();
        let mut rep = Rep {
            id: 1,
            name: "Rep One".to_string(),
            phone: None,
            email: None,
            title: None,
            company: None,
            bio: None,
            photo_url: None,
            cal_link: None,
            is_active: true,
            redirect_url: Some("   ".to_string()),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(rep.redirect_target(), None);

        rep.redirect_url = Some("https://example.com/deal".to_string());
        assert_eq!(rep.redirect_target(), Some("https://example.com/deal"));
    }
}
