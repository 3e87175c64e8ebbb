//! Rep management service
//!
//! Reps are created with an externally assigned id and are never hard-deleted;
//! "delete" flips `isActive`.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::funnel::FunnelAggregator;
use crate::errors::{Result, TaplinkerError};
use crate::storage::{Lead, LeadFilter, NewRep, Rep, RepPatch, RepStats, SeaOrmStorage, Tag};
use crate::utils::url_validator::validate_optional_url;

/// Number of recent leads embedded in the rep detail view
pub const RECENT_LEADS: u64 = 20;

/// Rep row in the admin listing
#[derive(Debug, Clone, Serialize)]
pub struct RepWithStats {
    #[serde(flatten)]
    pub rep: Rep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RepStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepCounts {
    pub leads: u64,
    pub events: u64,
}

/// Rep with recent leads, tags and totals
#[derive(Debug, Clone, Serialize)]
pub struct RepDetail {
    #[serde(flatten)]
    pub rep: Rep,
    pub leads: Vec<Lead>,
    pub tags: Vec<Tag>,
    #[serde(rename = "_count")]
    pub counts: RepCounts,
}

/// URL-bearing fields must be http(s) when present
fn validate_rep_urls(
    photo_url: Option<&str>,
    cal_link: Option<&str>,
    redirect_url: Option<&str>,
) -> Result<()> {
    validate_optional_url(photo_url)?;
    validate_optional_url(cal_link)?;
    validate_optional_url(redirect_url)
}

pub struct RepService {
    storage: Arc<SeaOrmStorage>,
    funnel: Arc<FunnelAggregator>,
}

impl RepService {
    pub fn new(storage: Arc<SeaOrmStorage>, funnel: Arc<FunnelAggregator>) -> Self {
        Self { storage, funnel }
    }

    /// List all reps, optionally with all-time stats
    pub async fn list_reps(&self, with_stats: bool) -> Result<Vec<RepWithStats>> {
        let reps = self.storage.list_reps().await?;
        if !with_stats {
            return Ok(reps
                .into_iter()
                .map(|rep| RepWithStats { rep, stats: None })
                .collect());
        }

        let mut stats = self.funnel.rep_stats().await?;
        Ok(reps
            .into_iter()
            .map(|rep| {
                let rep_stats = stats.remove(&rep.id).unwrap_or_else(|| RepStats {
                    conversion_rate: "0".to_string(),
                    ..Default::default()
                });
                RepWithStats {
                    rep,
                    stats: Some(rep_stats),
                }
            })
            .collect())
    }

    pub async fn get_rep(&self, id: i32) -> Result<Rep> {
        self.storage
            .get_rep(id)
            .await?
            .ok_or_else(|| TaplinkerError::not_found("Rep not found"))
    }

    /// Rep detail: 20 most recent leads, tags and totals
    pub async fn get_rep_detail(&self, id: i32) -> Result<RepDetail> {
        let rep = self.get_rep(id).await?;

        let filter = LeadFilter {
            rep_id: Some(id),
            limit: RECENT_LEADS,
            ..Default::default()
        };
        let (leads, lead_total) = self.storage.list_leads(&filter).await?;
        let tags = self.storage.list_tags_for_rep(id).await?;
        let events = self.storage.count_events_for_rep(id).await?;

        Ok(RepDetail {
            rep,
            leads,
            tags,
            counts: RepCounts {
                leads: lead_total,
                events,
            },
        })
    }

    /// Create a rep with an explicit id; 409 when the id is taken
    pub async fn create_rep(&self, mut new_rep: NewRep) -> Result<Rep> {
        if new_rep.id <= 0 {
            return Err(TaplinkerError::validation("Rep id must be a positive integer"));
        }
        new_rep.name = new_rep.name.trim().to_string();
        if new_rep.name.is_empty() {
            return Err(TaplinkerError::validation("Name is required"));
        }
        validate_rep_urls(
            new_rep.photo_url.as_deref(),
            new_rep.cal_link.as_deref(),
            new_rep.redirect_url.as_deref(),
        )?;

        let rep = self.storage.insert_rep(new_rep).await?;
        info!("RepService: created rep {} ({})", rep.id, rep.name);
        Ok(rep)
    }

    /// Apply an allow-listed patch; a new redirectUrl applies to the next tap
    pub async fn patch_rep(&self, id: i32, patch: RepPatch) -> Result<Rep> {
        if let Some(name) = patch.name.as_deref()
            && name.trim().is_empty()
        {
            return Err(TaplinkerError::validation("Name cannot be empty"));
        }
        validate_rep_urls(
            patch.photo_url.as_ref().and_then(|v| v.as_deref()),
            patch.cal_link.as_ref().and_then(|v| v.as_deref()),
            patch.redirect_url.as_ref().and_then(|v| v.as_deref()),
        )?;

        let rep = self
            .storage
            .update_rep(id, patch)
            .await?
            .ok_or_else(|| TaplinkerError::not_found("Rep not found"))?;

        info!(
            "RepService: updated rep {} (active={}, redirect={:?})",
            rep.id,
            rep.is_active,
            rep.redirect_target()
        );
        Ok(rep)
    }

    /// Soft delete
    pub async fn deactivate_rep(&self, id: i32) -> Result<Rep> {
        let patch = RepPatch {
            is_active: Some(false),
            ..Default::default()
        };
        let rep = self
            .storage
            .update_rep(id, patch)
            .await?
            .ok_or_else(|| TaplinkerError::not_found("Rep not found"))?;

        info!("RepService: deactivated rep {}", rep.id);
        Ok(rep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rep_urls() {
        assert!(validate_rep_urls(None, None, None).is_ok());
        assert!(validate_rep_urls(Some(""), Some("https://cal.com/x"), Some(" ")).is_ok());
        assert!(validate_rep_urls(None, None, Some("javascript:alert(1)")).is_err());
        assert!(validate_rep_urls(Some("ftp://x/y.png"), None, None).is_err());
    }
}
