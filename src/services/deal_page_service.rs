//! Deal page（单例记录）

use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::storage::{DealPage, DealPagePatch, SeaOrmStorage};
use crate::utils::url_validator::validate_optional_url;

pub struct DealPageService {
    storage: Arc<SeaOrmStorage>,
}

impl DealPageService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 尚未设置时返回 None
    pub async fn get(&self) -> Result<Option<DealPage>> {
        self.storage.get_deal_page().await
    }

    pub async fn update(&self, patch: DealPagePatch) -> Result<DealPage> {
        validate_optional_url(patch.cta_url.as_ref().and_then(|v| v.as_deref()))?;
        validate_optional_url(patch.logo_url.as_ref().and_then(|v| v.as_deref()))?;

        let page = self.storage.upsert_deal_page(patch).await?;
        info!("Deal page updated (live={})", page.is_live);
        Ok(page)
    }
}
