//! 事件日志写入与明细查询
//!
//! events 表只追加，不提供更新或删除。

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::trace;

use super::converters::{model_to_event, new_event_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{Event, NewEvent};

use migration::entities::event;

impl SeaOrmStorage {
    /// 追加一条事件，created_at 使用服务器时钟（UTC）
    pub async fn insert_event(&self, new_event: &NewEvent) -> Result<i64> {
        let db = &self.db;
        let active = new_event_to_active_model(new_event, Utc::now())?;

        let model = retry::with_retry("insert_event", self.retry_config, || {
            let active = active.clone();
            async move { active.insert(db).await }
        })
        .await
        .map_err(|e| TaplinkerError::database_operation(format!("写入事件失败: {}", e)))?;

        trace!(
            "Event {} recorded: rep={} type={}",
            model.id, model.rep_id, model.event_type
        );
        Ok(model.id)
    }

    /// 某个 rep 最近的事件（新的在前）
    pub async fn list_events_for_rep(&self, rep_id: i32, limit: u64) -> Result<Vec<Event>> {
        let models = event::Entity::find()
            .filter(event::Column::RepId.eq(rep_id))
            .order_by_desc(event::Column::CreatedAt)
            .order_by_desc(event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询事件失败: {}", e)))?;

        models.into_iter().map(model_to_event).collect()
    }

    /// 某个 rep 的事件总数
    pub async fn count_events_for_rep(&self, rep_id: i32) -> Result<u64> {
        event::Entity::find()
            .filter(event::Column::RepId.eq(rep_id))
            .count(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("统计事件失败: {}", e)))
    }
}
