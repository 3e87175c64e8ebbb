//! Lead 读写

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::info;

use super::converters::{model_to_lead, new_lead_to_active_model, normalize_optional};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{Lead, LeadFilter, LeadPatch, LeadStatus, NewLead};

use migration::entities::lead;

/// 已校验的线索更新（status 已解析）
#[derive(Debug, Clone, Default)]
pub struct LeadUpdate {
    pub status: Option<LeadStatus>,
    pub notes: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip: Option<Option<String>>,
}

impl LeadUpdate {
    pub fn status_only(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// 合并 PATCH 请求体（status 由调用方解析后传入）
    pub fn from_patch(patch: LeadPatch, status: Option<LeadStatus>) -> Self {
        Self {
            status,
            notes: patch.notes,
            phone: patch.phone,
            email: patch.email,
            address: patch.address,
            city: patch.city,
            state: patch.state,
            zip: patch.zip,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct RepLeadCountRow {
    rep_id: i32,
    count: i64,
}

impl SeaOrmStorage {
    /// 插入线索（id 为 uuid v4，status = NEW）
    pub async fn insert_lead(&self, new_lead: NewLead) -> Result<Lead> {
        let db = &self.db;
        let id = uuid::Uuid::new_v4().to_string();
        let active = new_lead_to_active_model(id.clone(), new_lead, Utc::now());

        let model = retry::with_retry(&format!("insert_lead({})", id), self.retry_config, || {
            let active = active.clone();
            async move { active.insert(db).await }
        })
        .await
        .map_err(|e| TaplinkerError::database_operation(format!("写入线索失败: {}", e)))?;

        info!("Lead {} captured for rep {}", model.id, model.rep_id);
        model_to_lead(model)
    }

    pub async fn get_lead(&self, id: &str) -> Result<Option<Lead>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_lead({})", id), self.retry_config, || async {
            lead::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map_err(|e| TaplinkerError::database_operation(format!("查询线索失败: {}", e)))?;

        model.map(model_to_lead).transpose()
    }

    /// 分页查询（新的在前），同时返回满足条件的总数
    pub async fn list_leads(&self, filter: &LeadFilter) -> Result<(Vec<Lead>, u64)> {
        let mut condition = Condition::all();
        if let Some(rep_id) = filter.rep_id {
            condition = condition.add(lead::Column::RepId.eq(rep_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(lead::Column::Status.eq(status.as_ref()));
        }

        let total = lead::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("统计线索失败: {}", e)))?;

        let models = lead::Entity::find()
            .filter(condition)
            .order_by_desc(lead::Column::CreatedAt)
            .order_by_desc(lead::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询线索失败: {}", e)))?;

        let leads = models
            .into_iter()
            .map(model_to_lead)
            .collect::<Result<Vec<_>>>()?;
        Ok((leads, total))
    }

    /// 局部更新；线索不存在时返回 None
    pub async fn update_lead(&self, id: &str, update: LeadUpdate) -> Result<Option<Lead>> {
        let Some(model) = lead::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        if let Some(status) = update.status {
            active.status = Set(status.as_ref().to_string());
        }
        if let Some(notes) = update.notes {
            active.notes = Set(normalize_optional(notes));
        }
        if let Some(phone) = update.phone {
            active.phone = Set(normalize_optional(phone));
        }
        if let Some(email) = update.email {
            active.email = Set(normalize_optional(email));
        }
        if let Some(address) = update.address {
            active.address = Set(normalize_optional(address));
        }
        if let Some(city) = update.city {
            active.city = Set(normalize_optional(city));
        }
        if let Some(state) = update.state {
            active.state = Set(normalize_optional(state));
        }
        if let Some(zip) = update.zip {
            active.zip = Set(normalize_optional(zip));
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("更新线索失败: {}", e)))?;

        model_to_lead(model).map(Some)
    }

    /// 每个 rep 的线索数
    pub async fn count_leads_by_rep(&self) -> Result<HashMap<i32, u64>> {
        let rows = lead::Entity::find()
            .select_only()
            .column(lead::Column::RepId)
            .column_as(lead::Column::Id.count(), "count")
            .group_by(lead::Column::RepId)
            .into_model::<RepLeadCountRow>()
            .all(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("统计线索失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.rep_id, row.count.max(0) as u64))
            .collect())
    }
}
