//! Funnel Aggregator
//!
//! TAP → VIEW → SUBMIT 漏斗统计。结果只取决于事件日志与时间窗口，
//! `aggregate_at` 显式传入 now，便于复现。

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::errors::{Result, TaplinkerError};
use crate::storage::{EventType, EventWindow, RepStats, RepTypeCount, SeaOrmStorage};

/// 日期桶格式（UTC 日历日）
const DAY_FORMAT: &str = "%Y-%m-%d";

/// 查询参数
#[derive(Debug, Clone, Copy, Default)]
pub struct FunnelQuery {
    /// None 时使用配置中的默认天数
    pub days: Option<i64>,
    pub rep_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSummary {
    pub taps: u64,
    pub views: u64,
    pub submits: u64,
    pub conversion_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    pub summary: FunnelSummary,
    pub by_rep: Vec<RepTypeCount>,
    pub daily_chart: Vec<DailyPoint>,
}

/// submits / taps * 100，保留一位小数；taps 为 0 时为 "0"
///
/// 用整数运算做四舍五入（half-up），6.25 → "6.3"
pub fn conversion_rate(submits: u64, taps: u64) -> String {
    if taps == 0 {
        return "0".to_string();
    }
    // 以 0.1% 为单位：round(submits * 1000 / taps)
    let taps = u128::from(taps);
    let tenths = (u128::from(submits) * 2000 + taps) / (taps * 2);
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// 按 UTC 日期分桶，升序，只包含有数据的日期
pub fn bucket_daily(timestamps: &[DateTime<Utc>]) -> Vec<DailyPoint> {
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for ts in timestamps {
        *buckets.entry(ts.format(DAY_FORMAT).to_string()).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(date, count)| DailyPoint { date, count })
        .collect()
}

/// 由分组计数汇总出 summary
pub fn summarize(by_rep: &[RepTypeCount]) -> FunnelSummary {
    let total = |event_type: EventType| -> u64 {
        by_rep
            .iter()
            .filter(|c| c.event_type == event_type)
            .map(|c| c.count)
            .sum()
    };

    let taps = total(EventType::Tap);
    let submits = total(EventType::Submit);
    FunnelSummary {
        taps,
        views: total(EventType::View),
        submits,
        conversion_rate: conversion_rate(submits, taps),
    }
}

pub struct FunnelAggregator {
    storage: Arc<SeaOrmStorage>,
    default_days: u32,
    max_days: u32,
}

impl FunnelAggregator {
    pub fn new(storage: Arc<SeaOrmStorage>, default_days: u32, max_days: u32) -> Self {
        Self {
            storage,
            default_days: default_days.max(1),
            max_days: max_days.max(1),
        }
    }

    pub fn from_config(storage: Arc<SeaOrmStorage>) -> Self {
        let config = crate::config::get_config();
        Self::new(
            storage,
            config.analytics.default_days,
            config.analytics.max_days,
        )
    }

    /// 解析窗口天数：默认值、下限 1、上限 max_days
    pub fn resolve_days(&self, requested: Option<i64>) -> Result<u32> {
        match requested {
            None => Ok(self.default_days.min(self.max_days)),
            Some(days) if days < 1 => Err(TaplinkerError::validation(
                "days must be a positive integer",
            )),
            Some(days) => Ok(days.min(self.max_days as i64) as u32),
        }
    }

    pub async fn aggregate(&self, query: FunnelQuery) -> Result<FunnelReport> {
        self.aggregate_at(query, Utc::now()).await
    }

    /// 在给定时刻计算 `[now - days, now]` 窗口内的漏斗
    pub async fn aggregate_at(&self, query: FunnelQuery, now: DateTime<Utc>) -> Result<FunnelReport> {
        let days = self.resolve_days(query.days)?;
        let since = now - Duration::days(days as i64);
        let window = EventWindow::new(since, now, query.rep_id);

        let by_rep = self.storage.count_events_by_rep_and_type(window).await?;
        let tap_times = self.storage.event_timestamps(EventType::Tap, window).await?;

        let summary = summarize(&by_rep);
        let daily_chart = bucket_daily(&tap_times);

        debug!(
            "Funnel over {} days (rep={:?}): taps={} views={} submits={}",
            days, query.rep_id, summary.taps, summary.views, summary.submits
        );

        Ok(FunnelReport {
            summary,
            by_rep,
            daily_chart,
        })
    }

    /// 每个 rep 的全量统计（不限时间）
    pub async fn rep_stats(&self) -> Result<HashMap<i32, RepStats>> {
        let counts = self
            .storage
            .count_events_by_rep_and_type(EventWindow::all_time())
            .await?;
        let leads = self.storage.count_leads_by_rep().await?;

        let mut stats: HashMap<i32, RepStats> = HashMap::new();
        for count in counts {
            let entry = stats.entry(count.rep_id).or_default();
            match count.event_type {
                EventType::Tap => entry.taps = count.count,
                EventType::Submit => entry.submits = count.count,
                _ => {}
            }
        }
        for (rep_id, lead_count) in leads {
            stats.entry(rep_id).or_default().leads = lead_count;
        }
        for entry in stats.values_mut() {
            entry.conversion_rate = conversion_rate(entry.submits, entry.taps);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_conversion_rate_zero_taps() {
        assert_eq!(conversion_rate(0, 0), "0");
        assert_eq!(conversion_rate(5, 0), "0");
    }

    #[test]
    fn test_conversion_rate_one_decimal() {
        assert_eq!(conversion_rate(1, 3), "33.3");
        assert_eq!(conversion_rate(2, 3), "66.7");
        assert_eq!(conversion_rate(1, 1), "100.0");
        assert_eq!(conversion_rate(0, 4), "0.0");
        assert_eq!(conversion_rate(3, 2), "150.0");
    }

    #[test]
    fn test_conversion_rate_rounds_ties_up() {
        assert_eq!(conversion_rate(1, 16), "6.3");
        assert_eq!(conversion_rate(1, 80), "1.3");
        assert_eq!(conversion_rate(5, 80), "6.3");
        assert_eq!(conversion_rate(1, 400), "0.3");
        assert_eq!(conversion_rate(1, 8), "12.5");
        assert_eq!(conversion_rate(1, 7), "14.3");
        assert_eq!(conversion_rate(1, 2001), "0.0");
    }

    #[test]
    fn test_bucket_daily_ascending_without_gaps() {
        let ts = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
        let points = bucket_daily(&[ts(5, 23), ts(2, 1), ts(5, 0), ts(2, 12), ts(9, 6)]);

        assert_eq!(
            points,
            vec![
                DailyPoint { date: "2026-03-02".to_string(), count: 2 },
                DailyPoint { date: "2026-03-05".to_string(), count: 2 },
                DailyPoint { date: "2026-03-09".to_string(), count: 1 },
            ]
        );
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert!(points.iter().all(|p| p.count > 0));
    }

    #[test]
    fn test_bucket_daily_empty() {
        assert!(bucket_daily(&[]).is_empty());
    }

    #[test]
    fn test_summarize_sums_across_reps() {
        let by_rep = vec![
            RepTypeCount { rep_id: 1, event_type: EventType::Tap, count: 4 },
            RepTypeCount { rep_id: 1, event_type: EventType::Submit, count: 1 },
            RepTypeCount { rep_id: 2, event_type: EventType::Tap, count: 4 },
            RepTypeCount { rep_id: 2, event_type: EventType::View, count: 3 },
            RepTypeCount { rep_id: 2, event_type: EventType::ContactSave, count: 9 },
        ];
        let summary = summarize(&by_rep);
        assert_eq!(summary.taps, 8);
        assert_eq!(summary.views, 3);
        assert_eq!(summary.submits, 1);
        assert_eq!(summary.conversion_rate, "12.5");
    }
}
