//! Event Recorder
//!
//! 校验事件类型后写入事件日志。写入失败（或超时）只记录 warn，
//! 调用方永远观察到成功。

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::best_effort::best_effort;
use crate::errors::{Result, TaplinkerError};
use crate::storage::backend::converters::meta_from_value;
use crate::storage::{EventMeta, EventType, NewEvent, SeaOrmStorage};

/// 外部提交的事件（POST /events）
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub rep_id: i32,
    /// 任意大小写
    pub event_type: String,
    pub meta: Option<Value>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// 大小写不敏感地解析事件类型
pub fn parse_event_type(raw: &str) -> Result<EventType> {
    EventType::from_str(raw).map_err(|_| TaplinkerError::invalid_event_type("Invalid event type"))
}

pub struct EventRecorder {
    storage: Arc<SeaOrmStorage>,
    write_timeout: Duration,
}

impl EventRecorder {
    pub fn new(storage: Arc<SeaOrmStorage>, write_timeout: Duration) -> Self {
        Self {
            storage,
            write_timeout,
        }
    }

    /// 按全局配置的写入超时创建
    pub fn from_config(storage: Arc<SeaOrmStorage>) -> Self {
        let config = crate::config::get_config();
        Self::new(
            storage,
            Duration::from_millis(config.analytics.event_write_timeout_ms),
        )
    }

    /// 校验并记录外部提交的事件
    ///
    /// 只有校验错误会返回 Err；存储失败被吞掉。
    pub async fn record(&self, input: EventInput) -> Result<()> {
        if input.rep_id <= 0 {
            return Err(TaplinkerError::validation("Invalid payload"));
        }
        let event_type = parse_event_type(&input.event_type)?;
        let meta = input.meta.map(meta_from_value).unwrap_or_default();

        self.record_event(NewEvent {
            rep_id: input.rep_id,
            event_type,
            meta,
            user_agent: input.user_agent,
            ip: input.ip,
        })
        .await;
        Ok(())
    }

    /// 记录已构造好的事件，返回写入的 id（失败时 None）
    pub async fn record_event(&self, event: NewEvent) -> Option<i64> {
        let label = format!("record {} event for rep {}", event.event_type, event.rep_id);
        let id = best_effort(&label, self.write_timeout, self.storage.insert_event(&event)).await;
        if let Some(id) = id {
            debug!("Recorded {} event {} for rep {}", event.event_type, id, event.rep_id);
        }
        id
    }

    /// 便捷方法：直接给出类型与元数据
    pub async fn record_typed(
        &self,
        rep_id: i32,
        event_type: EventType,
        meta: EventMeta,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> Option<i64> {
        self.record_event(NewEvent {
            rep_id,
            event_type,
            meta,
            user_agent,
            ip,
        })
        .await
    }
}
