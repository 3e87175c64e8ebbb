//! Tap Resolver
//!
//! 每次 tap 都从数据库重新读取 rep，决定跳转还是渲染个人页。
//! 跳转分支在服务端记录 TAP；个人页分支由页面加载后自行上报。

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, trace};

use super::event_recorder::EventRecorder;
use crate::errors::{Result, TaplinkerError};
use crate::storage::{EventMeta, EventType, Rep, SeaOrmStorage};

/// tap 请求上下文
#[derive(Debug, Clone, Default)]
pub struct TapContext {
    /// 请求路径（写入事件 meta）
    pub path: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// 解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum TapResolution {
    /// 302 到 rep 配置的 redirectUrl
    Redirect { rep_id: i32, url: String },
    /// 渲染个人页
    Profile(Rep),
}

/// 只接受纯数字的正整数 id
pub fn parse_rep_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}

pub struct TapResolver {
    storage: Arc<SeaOrmStorage>,
    recorder: Arc<EventRecorder>,
}

impl TapResolver {
    pub fn new(storage: Arc<SeaOrmStorage>, recorder: Arc<EventRecorder>) -> Self {
        Self { storage, recorder }
    }

    /// 查找可以接收 tap 的 rep；格式错误、不存在、已停用一律 NotFound
    pub async fn find_active_rep(&self, raw_id: &str) -> Result<Rep> {
        let not_found = || TaplinkerError::not_found("Rep not found");

        let id = parse_rep_id(raw_id).ok_or_else(not_found)?;
        match self.storage.get_rep(id).await? {
            Some(rep) if rep.is_active => Ok(rep),
            Some(_) => {
                debug!("Tap for inactive rep {}", id);
                Err(not_found())
            }
            None => Err(not_found()),
        }
    }

    /// 解析一次 tap；每次调用最多写入一条 TAP 事件
    pub async fn resolve(&self, raw_id: &str, ctx: TapContext) -> Result<TapResolution> {
        let rep = self.find_active_rep(raw_id).await?;

        let Some(url) = rep.redirect_target().map(str::to_string) else {
            trace!("Rep {} has no redirect, rendering profile", rep.id);
            return Ok(TapResolution::Profile(rep));
        };

        let mut meta = EventMeta::new();
        meta.insert("redirected".to_string(), json!(true));
        meta.insert("path".to_string(), json!(ctx.path));
        self.recorder
            .record_typed(rep.id, EventType::Tap, meta, ctx.user_agent, ctx.ip)
            .await;

        debug!("Rep {} tap redirected to {}", rep.id, url);
        Ok(TapResolution::Redirect {
            rep_id: rep.id,
            url,
        })
    }
}
