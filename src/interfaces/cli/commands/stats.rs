//! Show scan statistics command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{AnalyticsService, QrService};

pub async fn show_stats(
    service: &QrService,
    analytics: &AnalyticsService,
    id: &str,
) -> Result<(), CliError> {
    let record = service.get(id).await?;
    let stats = analytics.stats(id).await?;

    println!(
        "{} {} ({})",
        "Scan statistics for".bold().green(),
        record.name.bold(),
        record.id.cyan()
    );
    println!("  {:<16}{}", "Total scans:", stats.total_scans.to_string().green());
    println!(
        "  {:<16}{}",
        "Unique visitors:",
        stats.unique_visitors.to_string().green()
    );
    println!("  {:<16}{}", "Repeat scans:", stats.repeat_scans.to_string().green());

    if !stats.scans_per_day.is_empty() {
        println!();
        println!("  {}", "Scans per day:".bold());
        for day in &stats.scans_per_day {
            println!("    {}  {}", day.date.to_string().yellow(), day.count);
        }
    }

    Ok(())
}
