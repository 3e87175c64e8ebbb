//! NFC tag 库存读写

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_tag, new_tag_to_active_model};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{NewTag, Tag, TagType};

use migration::entities::tag;

impl SeaOrmStorage {
    /// 按类型过滤的 tag 列表（新的在前）
    pub async fn list_tags(&self, tag_type: Option<TagType>) -> Result<Vec<Tag>> {
        let mut query = tag::Entity::find().order_by_desc(tag::Column::CreatedAt);
        if let Some(tag_type) = tag_type {
            query = query.filter(tag::Column::TagType.eq(tag_type.as_ref()));
        }

        let models = query
            .all(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询 tag 失败: {}", e)))?;

        models.into_iter().map(model_to_tag).collect()
    }

    pub async fn list_tags_for_rep(&self, rep_id: i32) -> Result<Vec<Tag>> {
        let models = tag::Entity::find()
            .filter(tag::Column::RepId.eq(rep_id))
            .order_by_desc(tag::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询 tag 失败: {}", e)))?;

        models.into_iter().map(model_to_tag).collect()
    }

    pub async fn find_tag_by_uid(&self, uid: &str) -> Result<Option<Tag>> {
        let model = tag::Entity::find()
            .filter(tag::Column::Uid.eq(uid))
            .one(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询 tag 失败: {}", e)))?;

        model.map(model_to_tag).transpose()
    }

    /// 插入 tag；uid 重复时返回 Conflict
    pub async fn insert_tag(&self, new_tag: NewTag) -> Result<Tag> {
        if let Some(uid) = new_tag.uid.as_deref().map(str::trim).filter(|u| !u.is_empty())
            && self.find_tag_by_uid(uid).await?.is_some()
        {
            return Err(TaplinkerError::conflict(format!(
                "Tag UID already exists: {}",
                uid
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let model = new_tag_to_active_model(id, new_tag, Utc::now())
            .insert(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("创建 tag 失败: {}", e)))?;

        info!("Tag {} created ({})", model.id, model.tag_type);
        model_to_tag(model)
    }
}
