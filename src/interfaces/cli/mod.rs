//! CLI interface module
//!
//! 直接连接数据库执行管理命令，不经过 HTTP 服务。

pub mod commands;

use crate::cli::{Commands, ConfigCommands};
use crate::config::get_config;
use crate::runtime::lifetime::startup::prepare_services;
use commands::{config_generate, create_code, delete_code, list_codes, show_stats};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::SmartQrError> for CliError {
    fn from(err: crate::errors::SmartQrError) -> Self {
        use crate::errors::SmartQrError;
        match err {
            SmartQrError::InvalidInput(msg) => CliError::ParseError(msg),
            SmartQrError::NotFound(msg) | SmartQrError::InvalidState(msg) => {
                CliError::CommandError(msg)
            }
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate 不需要数据库连接
    let cmd = match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => return config_generate(output_path, force).await,
        other => other,
    };

    let config = get_config();
    let ctx = prepare_services(&config)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;

    match cmd {
        Commands::Create {
            name,
            data,
            redirect_url,
            fill,
            back,
            logo,
            no_redirect,
        } => {
            let mut req = crate::services::CreateQrRequest::new(name, data);
            req.redirect_url = redirect_url;
            req.style.fill_color = fill;
            req.style.back_color = back;
            req.style.logo_path = logo;
            req.use_redirect = !no_redirect;
            create_code(&ctx.qr_service, req).await
        }

        Commands::List => list_codes(&ctx.qr_service).await,

        Commands::Stats { id } => show_stats(&ctx.qr_service, &ctx.analytics_service, &id).await,

        Commands::Delete { id } => delete_code(&ctx.qr_service, &id).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server entry point".to_string(),
        )),

        Commands::Config { .. } => Err(CliError::CommandError(
            "config commands do not need a database connection".to_string(),
        )),
    }
}
