use clap::Parser;
use ecas_etl::utils::error::ErrorSeverity;
use ecas_etl::utils::logger;
use ecas_etl::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入並驗證配置，失敗時日誌尚未初始化，直接輸出到 stderr
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(&config.logging.level, cli.verbose);
    } else {
        logger::init_cli_logger(&config.logging.level, cli.verbose);
    }

    tracing::info!("🚀 Starting ecas-etl");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    tracing::info!(
        "🔧 Tool: {} (timeout {}s, password via {:?})",
        config.tool.command,
        config.tool.timeout_seconds,
        config.tool.password_transport
    );

    ecas_etl::start_server(config).await?;
    Ok(())
}
