//! 单行促销页（id = 1）

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel};

use super::SeaOrmStorage;
use super::converters::{model_to_deal_page, normalize_optional};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{DealPage, DealPagePatch};

use migration::entities::deal_page;

/// 唯一记录的主键
pub const DEAL_PAGE_ID: i32 = 1;

impl SeaOrmStorage {
    pub async fn get_deal_page(&self) -> Result<Option<DealPage>> {
        let model = deal_page::Entity::find_by_id(DEAL_PAGE_ID)
            .one(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询促销页失败: {}", e)))?;

        Ok(model.map(model_to_deal_page))
    }

    /// 不存在时以默认值创建，再应用更新
    pub async fn upsert_deal_page(&self, patch: DealPagePatch) -> Result<DealPage> {
        let existing = deal_page::Entity::find_by_id(DEAL_PAGE_ID)
            .one(&self.db)
            .await?;
        let is_new = existing.is_none();

        let mut active = match existing {
            Some(model) => model.into_active_model(),
            None => deal_page::ActiveModel {
                id: Set(DEAL_PAGE_ID),
                is_live: Set(false),
                badge: Set(None),
                headline: Set(None),
                subheadline: Set(None),
                body: Set(None),
                cta_text: Set(None),
                cta_url: Set(None),
                company_name: Set(None),
                logo_url: Set(None),
                updated_at: Set(Utc::now()),
            },
        };

        if let Some(is_live) = patch.is_live {
            active.is_live = Set(is_live);
        }
        if let Some(badge) = patch.badge {
            active.badge = Set(normalize_optional(badge));
        }
        if let Some(headline) = patch.headline {
            active.headline = Set(normalize_optional(headline));
        }
        if let Some(subheadline) = patch.subheadline {
            active.subheadline = Set(normalize_optional(subheadline));
        }
        if let Some(body) = patch.body {
            active.body = Set(normalize_optional(body));
        }
        if let Some(cta_text) = patch.cta_text {
            active.cta_text = Set(normalize_optional(cta_text));
        }
        if let Some(cta_url) = patch.cta_url {
            active.cta_url = Set(normalize_optional(cta_url));
        }
        if let Some(company_name) = patch.company_name {
            active.company_name = Set(normalize_optional(company_name));
        }
        if let Some(logo_url) = patch.logo_url {
            active.logo_url = Set(normalize_optional(logo_url));
        }
        active.updated_at = Set(Utc::now());

        let model = if is_new {
            active.insert(&self.db).await
        } else {
            active.update(&self.db).await
        }
        .map_err(|e| TaplinkerError::database_operation(format!("保存促销页失败: {}", e)))?;

        Ok(model_to_deal_page(model))
    }
}
