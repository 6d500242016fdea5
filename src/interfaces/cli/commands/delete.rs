//! Delete QR code command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::QrService;

pub async fn delete_code(service: &QrService, id: &str) -> Result<(), CliError> {
    let removed_scans = service.delete(id).await?;

    println!(
        "{} Deleted QR code: {} ({} scan events removed)",
        "✓".bold().green(),
        id.cyan(),
        removed_scans.to_string().yellow()
    );
    Ok(())
}
