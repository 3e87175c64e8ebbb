//! 完工项目读写

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_job, new_job_to_active_model};
use crate::errors::{Result, TaplinkerError};
use crate::storage::models::{Job, NewJob};

use migration::entities::job;

impl SeaOrmStorage {
    /// 有效项目，按完工日期倒序
    pub async fn list_active_jobs(&self) -> Result<Vec<Job>> {
        let models = job::Entity::find()
            .filter(job::Column::IsActive.eq(true))
            .order_by_desc(job::Column::CompletionDate)
            .order_by_desc(job::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询项目失败: {}", e)))?;

        models.into_iter().map(model_to_job).collect()
    }

    pub async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let model = job::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("查询项目失败: {}", e)))?;

        model.map(model_to_job).transpose()
    }

    pub async fn insert_job(&self, new_job: NewJob) -> Result<Job> {
        let id = uuid::Uuid::new_v4().to_string();
        let model = new_job_to_active_model(id, new_job, Utc::now())?
            .insert(&self.db)
            .await
            .map_err(|e| TaplinkerError::database_operation(format!("创建项目失败: {}", e)))?;

        info!("Job {} created", model.id);
        model_to_job(model)
    }
}
