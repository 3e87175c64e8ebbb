//! Funnel 聚合查询
//!
//! 计数与分组在数据库里完成；按天分桶需要跨后端一致的 UTC 日期，
//! 所以只取 TAP 的时间戳交给 service 层处理。

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
};
use std::str::FromStr;
use tracing::warn;

use super::{SeaOrmStorage, retry};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{EventType, RepTypeCount};

use migration::entities::event;

/// 事件扫描范围
#[derive(Debug, Clone, Copy, Default)]
pub struct EventWindow {
    /// created_at >= since（None 表示不限）
    pub since: Option<DateTime<Utc>>,
    /// created_at <= until（None 表示不限）
    pub until: Option<DateTime<Utc>>,
    pub rep_id: Option<i32>,
}

impl EventWindow {
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>, rep_id: Option<i32>) -> Self {
        Self {
            since: Some(since),
            until: Some(until),
            rep_id,
        }
    }

    /// 不限时间（rep 全量统计）
    pub fn all_time() -> Self {
        Self::default()
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(since) = self.since {
            condition = condition.add(event::Column::CreatedAt.gte(since));
        }
        if let Some(until) = self.until {
            condition = condition.add(event::Column::CreatedAt.lte(until));
        }
        if let Some(rep_id) = self.rep_id {
            condition = condition.add(event::Column::RepId.eq(rep_id));
        }
        condition
    }
}

// ============ 查询结果类型 ============

#[derive(Debug, FromQueryResult)]
struct RepTypeCountRow {
    rep_id: i32,
    event_type: String,
    count: i64,
}

impl SeaOrmStorage {
    /// 按 (rep_id, type) 分组计数
    pub async fn count_events_by_rep_and_type(
        &self,
        window: EventWindow,
    ) -> Result<Vec<RepTypeCount>> {
        let db = &self.db;

        let rows = retry::with_retry("count_events_by_rep_and_type", self.retry_config, || async {
            event::Entity::find()
                .select_only()
                .column(event::Column::RepId)
                .column(event::Column::EventType)
                .column_as(event::Column::Id.count(), "count")
                .filter(window.condition())
                .group_by(event::Column::RepId)
                .group_by(event::Column::EventType)
                .into_model::<RepTypeCountRow>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| TaplinkerError::database_operation(format!("事件分组统计失败: {}", e)))?;

        let mut counts: Vec<RepTypeCount> = rows
            .into_iter()
            .filter_map(|row| match EventType::from_str(&row.event_type) {
                Ok(event_type) => Some(RepTypeCount {
                    rep_id: row.rep_id,
                    event_type,
                    count: row.count.max(0) as u64,
                }),
                Err(_) => {
                    warn!("Skipping unknown event type in log: {}", row.event_type);
                    None
                }
            })
            .collect();

        // 同一 rep 内按 funnel 阶段顺序：TAP, VIEW, SUBMIT, CONTACT_SAVE
        counts.sort_by_key(|c| (c.rep_id, c.event_type));
        Ok(counts)
    }

    /// 窗口内某类事件的时间戳（升序）
    pub async fn event_timestamps(
        &self,
        event_type: EventType,
        window: EventWindow,
    ) -> Result<Vec<DateTime<Utc>>> {
        let db = &self.db;

        retry::with_retry("event_timestamps", self.retry_config, || async {
            event::Entity::find()
                .select_only()
                .column(event::Column::CreatedAt)
                .filter(window.condition())
                .filter(event::Column::EventType.eq(event_type.as_ref()))
                .order_by_asc(event::Column::CreatedAt)
                .into_tuple::<DateTime<Utc>>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| TaplinkerError::database_operation(format!("查询事件时间失败: {}", e)))
    }
}
