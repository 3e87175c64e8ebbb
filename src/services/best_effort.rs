//! Best-effort 副作用
//!
//! 事件写入与通知失败时只记录 warn，不影响调用方的返回值。

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::errors::Result;

/// 等待 future 完成（最多 timeout），失败或超时时记录日志并丢弃错误
pub async fn best_effort<T, F>(label: &str, timeout: Duration, fut: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("{} failed (ignored): {}", label, e);
            None
        }
        Err(_) => {
            warn!(
                "{} timed out after {} ms (ignored)",
                label,
                timeout.as_millis()
            );
            None
        }
    }
}

/// 在独立 tokio 任务中执行 best_effort，调用方不等待结果
pub fn spawn_best_effort<F>(label: String, timeout: Duration, fut: F) -> JoinHandle<()>
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        best_effort(&label, timeout, fut).await;
    })
}
