//! List QR codes command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::QrService;

pub async fn list_codes(service: &QrService) -> Result<(), CliError> {
    let codes = service
        .list()
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load QR codes: {}", e)))?;

    if codes.is_empty() {
        println!("{} No QR codes found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "QR code list:".bold().green());
    println!();
    for summary in &codes {
        let record = &summary.record;
        let mut info_parts = vec![format!("{} {}", record.id.cyan(), record.name.bold())];

        if let Some(ref target) = record.redirect_target {
            info_parts.push(format!("-> {}", target.blue().underline()));
        }

        info_parts.push(
            format!("(created: {})", record.created_at.format("%Y-%m-%d %H:%M:%S UTC"))
                .dimmed()
                .yellow()
                .to_string(),
        );

        if summary.scan_count > 0 {
            info_parts.push(
                format!("(scans: {})", summary.scan_count)
                    .dimmed()
                    .cyan()
                    .to_string(),
            );
        }

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} QR codes",
        "ℹ".bold().blue(),
        codes.len().to_string().green()
    );
    Ok(())
}
