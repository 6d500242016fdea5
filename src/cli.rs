//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// SmartQR - Dynamic QR codes with redirect tracking and scan analytics
#[derive(Parser)]
#[command(name = "smartqr")]
#[command(version)]
#[command(about = "Dynamic QR code service with scan analytics", long_about = None)]
pub struct Cli {
    /// Path to config file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create a QR code
    Create {
        /// Display name
        #[arg(long, default_value = "")]
        name: String,

        /// Data to encode (usually a URL)
        data: String,

        /// Redirect target (defaults to DATA)
        #[arg(long)]
        redirect_url: Option<String>,

        /// Module color (name or #rrggbb)
        #[arg(long)]
        fill: Option<String>,

        /// Background color (name or #rrggbb)
        #[arg(long)]
        back: Option<String>,

        /// Logo image path, relative to qr.asset_root
        #[arg(long)]
        logo: Option<String>,

        /// Encode DATA directly instead of the tracked /r/{id} link
        #[arg(long)]
        no_redirect: bool,
    },

    /// List all QR codes with scan counts
    List,

    /// Show scan statistics for a QR code
    Stats {
        /// QR code id
        id: String,
    },

    /// Delete a QR code, its scan events and its image
    Delete {
        /// QR code id
        id: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_subcommand() {
        let cli = Cli::try_parse_from(["smartqr"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "smartqr",
            "-c",
            "custom.toml",
            "create",
            "https://example.com",
            "--name",
            "Menu",
            "--fill",
            "navy",
            "--no-redirect",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        match cli.command {
            Some(Commands::Create {
                name,
                data,
                fill,
                no_redirect,
                redirect_url,
                ..
            }) => {
                assert_eq!(name, "Menu");
                assert_eq!(data, "https://example.com");
                assert_eq!(fill.as_deref(), Some("navy"));
                assert!(no_redirect);
                assert!(redirect_url.is_none());
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_parse_config_generate() {
        let cli = Cli::try_parse_from(["smartqr", "config", "generate", "out.toml", "--force"])
            .unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigCommands::Generate { output_path, force },
            }) => {
                assert_eq!(output_path.as_deref(), Some("out.toml"));
                assert!(force);
            }
            _ => panic!("expected config generate"),
        }
    }

    #[test]
    fn test_stats_requires_id() {
        assert!(Cli::try_parse_from(["smartqr", "stats"]).is_err());
    }
}
