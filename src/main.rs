use clap::Parser;

use smartqr::cli::{Cli, Commands};
use smartqr::config::{get_config, init_config_from};
use smartqr::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            let _guard = init_logging(&config.logging)?;
            if let Err(e) = smartqr::runtime::modes::run_server().await {
                tracing::error!("{:#}", e);
                return Err(e);
            }
            Ok(())
        }
        Some(cmd) => {
            if let Err(e) = smartqr::runtime::modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
