//! NFC tag 库存
//!
//! tag 本身不接收流量，只记录实物与 rep/job 的对应关系。

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::errors::{Result, TaplinkerError};
use crate::storage::{NewTag, SeaOrmStorage, Tag, TagType};

/// POST /tags 请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInput {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub tag_type: Option<String>,
    #[serde(default)]
    pub is_locked: Option<bool>,
    #[serde(default)]
    pub rep_id: Option<i32>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn parse_tag_type(raw: &str) -> Result<TagType> {
    TagType::from_str(raw.trim())
        .map_err(|_| TaplinkerError::validation(format!("Invalid tag type: {}", raw)))
}

/// 校验类型与引用的组合并生成待写入的 tag
///
/// REP 只引用 rep，JOB 只引用 job，TRADESHOW / STATIC 都不引用。
pub fn build_tag(input: TagInput) -> Result<NewTag> {
    let tag_type = match input.tag_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_tag_type(raw)?,
        _ => TagType::default(),
    };
    let job_id = input
        .job_id
        .map(|j| j.trim().to_string())
        .filter(|j| !j.is_empty());
    let rep_id = input.rep_id;

    match (tag_type, rep_id, job_id.as_ref()) {
        (TagType::Rep, Some(id), None) if id > 0 => {}
        (TagType::Rep, _, _) => {
            return Err(TaplinkerError::validation(
                "REP tags require repId and no jobId",
            ));
        }
        (TagType::Job, None, Some(_)) => {}
        (TagType::Job, _, _) => {
            return Err(TaplinkerError::validation(
                "JOB tags require jobId and no repId",
            ));
        }
        (TagType::Tradeshow | TagType::Static, None, None) => {}
        (other, _, _) => {
            return Err(TaplinkerError::validation(format!(
                "{} tags cannot reference a rep or job",
                other
            )));
        }
    }

    let trim = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Ok(NewTag {
        uid: trim(input.uid),
        label: trim(input.label),
        tag_type,
        is_locked: input.is_locked.unwrap_or(false),
        rep_id,
        job_id,
        notes: trim(input.notes),
    })
}

pub struct TagService {
    storage: Arc<SeaOrmStorage>,
}

impl TagService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list_tags(&self, tag_type: Option<&str>) -> Result<Vec<Tag>> {
        let tag_type = tag_type
            .filter(|t| !t.trim().is_empty())
            .map(parse_tag_type)
            .transpose()?;
        self.storage.list_tags(tag_type).await
    }

    /// 创建 tag；引用的 rep / job 必须存在
    pub async fn create_tag(&self, input: TagInput) -> Result<Tag> {
        let new_tag = build_tag(input)?;

        if let Some(rep_id) = new_tag.rep_id
            && self.storage.get_rep(rep_id).await?.is_none()
        {
            return Err(TaplinkerError::rep_not_found("Rep not found"));
        }
        if let Some(job_id) = new_tag.job_id.as_deref()
            && self.storage.get_job(job_id).await?.is_none()
        {
            return Err(TaplinkerError::not_found("Job not found"));
        }

        self.storage.insert_tag(new_tag).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(tag_type: Option<&str>, rep_id: Option<i32>, job_id: Option<&str>) -> TagInput {
        TagInput {
            tag_type: tag_type.map(String::from),
            rep_id,
            job_id: job_id.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_type_defaults_to_rep() {
        let tag = build_tag(input(None, Some(1), None)).unwrap();
        assert_eq!(tag.tag_type, TagType::Rep);
        assert!(!tag.is_locked);
    }

    #[test]
    fn test_reference_invariants() {
        assert!(build_tag(input(Some("REP"), Some(1), None)).is_ok());
        assert!(build_tag(input(Some("rep"), None, None)).is_err());
        assert!(build_tag(input(Some("REP"), Some(1), Some("job-1"))).is_err());
        assert!(build_tag(input(Some("REP"), Some(0), None)).is_err());

        assert!(build_tag(input(Some("JOB"), None, Some("job-1"))).is_ok());
        assert!(build_tag(input(Some("JOB"), Some(1), Some("job-1"))).is_err());
        assert!(build_tag(input(Some("JOB"), None, Some("  "))).is_err());

        assert!(build_tag(input(Some("TRADESHOW"), None, None)).is_ok());
        assert!(build_tag(input(Some("static"), None, None)).is_ok());
        assert!(build_tag(input(Some("STATIC"), Some(2), None)).is_err());
        assert!(build_tag(input(Some("TRADESHOW"), None, Some("job-1"))).is_err());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = build_tag(input(Some("BILLBOARD"), None, None)).unwrap_err();
        assert!(matches!(err, TaplinkerError::Validation(_)));
    }
}
