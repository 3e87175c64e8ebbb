//! Funnel command - print the funnel report

use std::sync::Arc;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{FunnelAggregator, FunnelQuery, FunnelReport};
use crate::storage::SeaOrmStorage;

/// 条形图最大宽度
const BAR_WIDTH: u64 = 40;

/// Print the funnel for the last `days` days
pub async fn print_funnel(
    storage: Arc<SeaOrmStorage>,
    days: Option<i64>,
    rep_id: Option<i32>,
    json: bool,
) -> Result<(), CliError> {
    let aggregator = FunnelAggregator::from_config(storage);
    let resolved_days = aggregator.resolve_days(days)?;
    let report = aggregator.aggregate(FunnelQuery { days, rep_id }).await?;

    if json {
        let output = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::CommandError(format!("Failed to serialize report: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    let scope = match rep_id {
        Some(id) => format!("rep #{}", id),
        None => "all reps".to_string(),
    };
    println!(
        "{} {}",
        format!("Funnel, last {} days", resolved_days).bold().green(),
        format!("({})", scope).dimmed()
    );
    print_report(&report);
    Ok(())
}

fn print_report(report: &FunnelReport) {
    let summary = &report.summary;
    println!("  {}:       {}", "Taps".cyan(), summary.taps);
    println!("  {}:      {}", "Views".cyan(), summary.views);
    println!("  {}:    {}", "Submits".cyan(), summary.submits);
    println!("  {}: {}%", "Conversion".cyan(), summary.conversion_rate.bold());

    if report.by_rep.is_empty() {
        println!("\n  {}", "No events in this window".dimmed());
        return;
    }

    println!("\n{}", "By rep".bold());
    for row in &report.by_rep {
        println!(
            "  #{:<6} {:<14} {}",
            row.rep_id,
            row.event_type.to_string().yellow(),
            row.count
        );
    }

    if !report.daily_chart.is_empty() {
        println!("\n{}", "Daily taps".bold());
        let max = report
            .daily_chart
            .iter()
            .map(|p| p.count)
            .max()
            .unwrap_or(1)
            .max(1);
        for point in &report.daily_chart {
            let width = (point.count * BAR_WIDTH).div_ceil(max) as usize;
            println!(
                "  {} {} {}",
                point.date.dimmed(),
                "#".repeat(width).blue(),
                point.count
            );
        }
    }
}
