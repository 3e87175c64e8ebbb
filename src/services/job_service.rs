//! 已完工项目（job）

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TaplinkerError};
use crate::storage::{Job, NewJob, SeaOrmStorage};
use crate::utils::url_validator::validate_optional_url;

/// homeownerName 与 address 必填，其余字段去除首尾空白
pub fn validate_job(mut job: NewJob) -> Result<NewJob> {
    job.homeowner_name = job.homeowner_name.trim().to_string();
    job.address = job.address.trim().to_string();
    if job.homeowner_name.is_empty() || job.address.is_empty() {
        return Err(TaplinkerError::validation(
            "homeownerName and address are required",
        ));
    }

    validate_optional_url(job.drone_video_url.as_deref())?;
    for url in &job.photo_urls {
        validate_optional_url(Some(url))?;
    }
    job.photo_urls.retain(|url| !url.trim().is_empty());
    Ok(job)
}

pub struct JobService {
    storage: Arc<SeaOrmStorage>,
}

impl JobService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 启用中的 job，按完工时间倒序
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.storage.list_active_jobs().await
    }

    pub async fn create_job(&self, job: NewJob) -> Result<Job> {
        let job = validate_job(job)?;
        if let Some(rep_id) = job.rep_id
            && self.storage.get_rep(rep_id).await?.is_none()
        {
            return Err(TaplinkerError::rep_not_found("Rep not found"));
        }

        let job = self.storage.insert_job(job).await?;
        info!("JobService: created job {} for {}", job.id, job.homeowner_name);
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields() {
        let missing = NewJob {
            homeowner_name: "  ".to_string(),
            address: "1 Main St".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            validate_job(missing).unwrap_err(),
            TaplinkerError::Validation(_)
        ));

        let ok = validate_job(NewJob {
            homeowner_name: " Pat Lee ".to_string(),
            address: "1 Main St".to_string(),
            photo_urls: vec!["https://cdn.example.com/1.jpg".to_string(), " ".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ok.homeowner_name, "Pat Lee");
        assert_eq!(ok.photo_urls.len(), 1);
    }

    #[test]
    fn test_rejects_non_http_media() {
        let job = NewJob {
            homeowner_name: "Pat Lee".to_string(),
            address: "1 Main St".to_string(),
            drone_video_url: Some("file:///tmp/a.mp4".to_string()),
            ..Default::default()
        };
        assert!(validate_job(job).is_err());
    }
}
