//! SeaORM storage backend
//!
//! Database storage using SeaORM, supporting SQLite, MySQL/MariaDB and
//! PostgreSQL. Reads and writes for each entity live in their own file as
//! separate `impl SeaOrmStorage` blocks.

mod connection;
pub mod converters;
mod deal_page;
mod events;
mod funnel;
mod jobs;
mod leads;
mod reps;
pub mod retry;
mod tags;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::errors::{Result, TaplinkerError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use funnel::EventWindow;
pub use leads::LeadUpdate;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(TaplinkerError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 重试配置
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(TaplinkerError::database_config("DATABASE_URL 未设置"));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig::from(&config.database);

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.database.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（关闭连接池等场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 健康检查：执行一次最简单的查询
    pub async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| TaplinkerError::database_connection(format!("数据库不可用: {}", e)))
    }
}
