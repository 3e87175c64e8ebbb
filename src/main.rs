use clap::Parser;

use taplinker::cli::{Cli, Commands};
use taplinker::config::{get_config, init_config_from};
use taplinker::runtime::modes;
use taplinker::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(&cli.config);

    match cli.command {
        None | Some(Commands::Serve) => {
            // guard 必须存活到进程结束，否则缓冲日志会丢失
            let _guard = init_logging(&get_config().logging)?;
            modes::run_server().await
        }
        Some(cmd) => {
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
