//! Rep 读写

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder};
use tracing::{error, info};

use super::converters::{model_to_rep, new_rep_to_active_model, normalize_optional};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{NewRep, Rep, RepPatch};

use migration::entities::rep;

impl SeaOrmStorage {
    /// 按 id 读取 Rep（每次都直接查库）
    pub async fn get_rep(&self, id: i32) -> Result<Option<Rep>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_rep({})", id), self.retry_config, || async {
            rep::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| {
            error!("查询 rep 失败（重试后仍失败）: {}", e);
            TaplinkerError::database_operation(format!("查询 rep 失败: {}", e))
        })?;

        Ok(model.map(model_to_rep))
    }

    /// 所有 rep，按 id 升序
    pub async fn list_reps(&self) -> Result<Vec<Rep>> {
        let db = &self.db;

        let models = retry::with_retry("list_reps", self.retry_config, || async {
            rep::Entity::find()
                .order_by_asc(rep::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| TaplinkerError::database_operation(format!("查询 rep 列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_rep).collect())
    }

    /// 创建 Rep；id 已被占用时返回 Conflict
    pub async fn insert_rep(&self, new_rep: NewRep) -> Result<Rep> {
        let id = new_rep.id;
        if self.get_rep(id).await?.is_some() {
            return Err(TaplinkerError::conflict("Rep ID already exists"));
        }

        let active = new_rep_to_active_model(new_rep, Utc::now());
        let model = active.insert(&self.db).await.map_err(|e| {
            TaplinkerError::database_operation(format!("创建 rep 失败: {}", e))
        })?;

        info!("Rep created: {}", id);
        Ok(model_to_rep(model))
    }

    /// 插入或覆盖 Rep（seed 使用），保留已有的 created_at
    pub async fn upsert_rep(&self, new_rep: NewRep) -> Result<Rep> {
        let now = Utc::now();
        let existing = rep::Entity::find_by_id(new_rep.id).one(&self.db).await?;

        let model = match existing {
            Some(model) => {
                let mut active = new_rep_to_active_model(new_rep, now);
                active.created_at = Set(model.created_at);
                active.update(&self.db).await?
            }
            None => new_rep_to_active_model(new_rep, now).insert(&self.db).await?,
        };

        Ok(model_to_rep(model))
    }

    /// 局部更新；Rep 不存在时返回 None
    pub async fn update_rep(&self, id: i32, patch: RepPatch) -> Result<Option<Rep>> {
        let Some(model) = rep::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(normalize_optional(phone));
        }
        if let Some(email) = patch.email {
            active.email = Set(normalize_optional(email));
        }
        if let Some(title) = patch.title {
            active.title = Set(normalize_optional(title));
        }
        if let Some(company) = patch.company {
            active.company = Set(normalize_optional(company));
        }
        if let Some(bio) = patch.bio {
            active.bio = Set(normalize_optional(bio));
        }
        if let Some(photo_url) = patch.photo_url {
            active.photo_url = Set(normalize_optional(photo_url));
        }
        if let Some(cal_link) = patch.cal_link {
            active.cal_link = Set(normalize_optional(cal_link));
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(redirect_url) = patch.redirect_url {
            active.redirect_url = Set(normalize_optional(redirect_url));
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("更新 rep 失败: {}", e)))?;

        Ok(Some(model_to_rep(model)))
    }
}
