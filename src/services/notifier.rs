//! 线索通知
//!
//! 新线索入库后通过 Resend 兼容的 HTTP 邮件接口通知业务方。
//! 通知在独立任务中执行，失败不会影响线索写入。

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::config::NotifyConfig;
use crate::errors::{Result, TaplinkerError};
use crate::storage::{Lead, Rep};
use crate::utils::escape_html;

/// 字段缺失时的占位符
const EMPTY_FIELD: &str = "-";

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent(timeout_secs: u64) -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs.max(1))))
            .build()
            .into()
    })
}

#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, lead: &Lead, rep: &Rep) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// 邮件接口请求体
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

pub fn email_subject(lead: &Lead, rep: &Rep) -> String {
    format!("New Lead: {} via {}", lead.name, rep.name)
}

/// 生成邮件正文，所有字段都经过 HTML 转义
pub fn email_html(lead: &Lead, rep: &Rep) -> String {
    let row = |label: &str, value: Option<&str>| {
        let value = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(escape_html)
            .unwrap_or_else(|| EMPTY_FIELD.to_string());
        format!(
            "<tr><td style=\"padding:4px 12px 4px 0;color:#666\">{}</td><td style=\"padding:4px 0\">{}</td></tr>",
            label, value
        )
    };

    let rows = [
        row("Lead Name", Some(&lead.name)),
        row("Phone", lead.phone.as_deref()),
        row("Email", lead.email.as_deref()),
        row("Address", lead.address.as_deref()),
        row("Rep", Some(&rep.name)),
        row("Notes", lead.notes.as_deref()),
    ]
    .join("");

    format!(
        "<h2>New inspection request</h2><table style=\"font-family:sans-serif;font-size:14px\">{}</table>",
        rows
    )
}

/// Resend 兼容的 HTTP 邮件通知
pub struct HttpEmailNotifier {
    config: NotifyConfig,
}

impl HttpEmailNotifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    pub fn payload(&self, lead: &Lead, rep: &Rep) -> EmailPayload {
        EmailPayload {
            from: self.config.from.clone(),
            to: self
                .config
                .to
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|addr| !addr.is_empty())
                .map(String::from)
                .collect(),
            subject: email_subject(lead, rep),
            html: email_html(lead, rep),
        }
    }

    /// 同步发送（在 spawn_blocking 中调用）
    fn send_sync(url: String, api_key: String, timeout_secs: u64, payload: EmailPayload) -> Result<()> {
        get_agent(timeout_secs)
            .post(&url)
            .header("Authorization", &format!("Bearer {}", api_key))
            .send_json(&payload)
            .map_err(|e| TaplinkerError::notification(format!("Email API request failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl LeadNotifier for HttpEmailNotifier {
    async fn notify(&self, lead: &Lead, rep: &Rep) -> Result<()> {
        let Some(api_key) = self.config.api_key.clone().filter(|_| self.config.is_configured()) else {
            warn!("Email not configured, skipping notification for lead {}", lead.id);
            return Ok(());
        };

        let payload = self.payload(lead, rep);
        let url = self.config.api_url.clone();
        let timeout_secs = self.config.timeout_secs;
        debug!("Sending lead notification for {} to {:?}", lead.id, payload.to);

        tokio::task::spawn_blocking(move || Self::send_sync(url, api_key, timeout_secs, payload))
            .await
            .map_err(|e| TaplinkerError::notification(format!("Notification task failed: {}", e)))??;

        info!("Lead notification sent for {}", lead.id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "HttpEmail"
    }
}

/// 未配置邮件时使用
pub struct NoopNotifier;

#[async_trait]
impl LeadNotifier for NoopNotifier {
    async fn notify(&self, lead: &Lead, _rep: &Rep) -> Result<()> {
        warn!("Email not configured, skipping notification for lead {}", lead.id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Noop"
    }
}

/// 根据配置选择通知实现
pub fn notifier_from_config(config: &NotifyConfig) -> Arc<dyn LeadNotifier> {
    if config.is_configured() {
        info!("Lead notifications enabled via {}", config.api_url);
        Arc::new(HttpEmailNotifier::new(config.clone()))
    } else {
        Arc::new(NoopNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LeadStatus;
    use chrono::Utc;

    fn sample() -> (Lead, Rep) {
        let now = Utc::now();
        let lead = Lead {
            id: "lead-1".to_string(),
            rep_id: 1,
            name: "Jane <b>Doe</b>".to_string(),
            phone: Some("555-222-3333".to_string()),
            email: None,
            address: Some("12 Elm & Main".to_string()),
            city: None,
            state: None,
            zip: None,
            notes: Some("   ".to_string()),
            status: LeadStatus::New,
            source: "nfc".to_string(),
            user_agent: None,
            ip: None,
            created_at: now,
            updated_at: now,
        };
        let rep = Rep {
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
            redirect_url: None,
            created_at: now,
            updated_at: now,
        };
        (lead, rep)
    }

    fn notify_config(to: Option<&str>) -> NotifyConfig {
        NotifyConfig {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: Some("re_test".to_string()),
            from: "leads@example.com".to_string(),
            to: to.map(String::from),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_email_html_escapes_fields() {
        let (lead, rep) = sample();
        let html = email_html(&lead, &rep);
        assert!(html.contains("Jane &lt;b&gt;Doe&lt;/b&gt;"));
        assert!(html.contains("12 Elm &amp; Main"));
        assert!(!html.contains("<b>Doe</b>"));
    }

    #[test]
    fn test_email_html_marks_missing_fields() {
        let (lead, rep) = sample();
        let html = email_html(&lead, &rep);
        assert!(html.contains(">Email</td><td style=\"padding:4px 0\">-</td>"));
        assert!(html.contains(">Notes</td><td style=\"padding:4px 0\">-</td>"));
    }

    #[test]
    fn test_payload_splits_recipients() {
        let (lead, rep) = sample();
        let notifier = HttpEmailNotifier::new(notify_config(Some("a@example.com, b@example.com")));
        let payload = notifier.payload(&lead, &rep);
        assert_eq!(payload.to, vec!["a@example.com", "b@example.com"]);
        assert_eq!(payload.subject, "New Lead: Jane <b>Doe</b> via Rep One");
        assert_eq!(payload.from, "leads@example.com");
    }

    #[test]
    fn test_notifier_from_config_falls_back_to_noop() {
        assert_eq!(notifier_from_config(&notify_config(None)).name(), "Noop");
        assert_eq!(
            notifier_from_config(&notify_config(Some("ops@example.com"))).name(),
            "HttpEmail"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_http_notifier_sends_nothing() {
        let (lead, rep) = sample();
        let notifier = HttpEmailNotifier::new(notify_config(None));
        assert!(notifier.notify(&lead, &rep).await.is_ok());
    }
}
