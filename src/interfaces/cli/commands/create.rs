//! Create QR code command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{CreateQrRequest, QrService};

pub async fn create_code(service: &QrService, req: CreateQrRequest) -> Result<(), CliError> {
    let tracked = req.use_redirect;
    let record = service.create(req).await?;

    println!(
        "{} Created QR code: {} ({})",
        "✓".bold().green(),
        record.id.cyan(),
        record.name.bold()
    );
    if tracked {
        println!(
            "  {} {}",
            "Encodes:".dimmed(),
            service.redirect_link(&record.id).blue().underline()
        );
    }
    if let Some(ref target) = record.redirect_target {
        println!("  {} {}", "Target:".dimmed(), target.blue().underline());
    }
    println!(
        "  {} {}",
        "Image:".dimmed(),
        service.image_path(&record.id).display().to_string().yellow()
    );

    Ok(())
}
