use clap::Parser;
use splynx_shaper::utils::error::ErrorSeverity;
use splynx_shaper::utils::{logger, validation::Validate};
use splynx_shaper::{
    CliConfig, EtlEngine, EtlError, LocalStorage, ShaperConfig, ShaperPipeline, SplynxClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting splynx-shaper");
    tracing::debug!("CLI config: {:?}", cli);

    let run = async {
        let mut config = ShaperConfig::from_file(&cli.config)?;
        if let Some(output_path) = &cli.output_path {
            config.output.output_path = output_path.clone();
        }

        // 驗證配置
        config.validate()?;

        if config.shaping.find_ipv6_using_mikrotik {
            tracing::warn!(
                "⚠️ IPv6 discovery via Mikrotik is not supported; the IPv6 column stays empty"
            );
        }

        let client = SplynxClient::from_config(&config, config.timeout())?;
        let options = config.assembly_options()?;
        let storage = LocalStorage::new(config.output.output_path.clone());
        let pipeline = ShaperPipeline::new(storage, client, config).with_options(options);

        let output_path = EtlEngine::new(pipeline).run().await?;
        Ok::<String, EtlError>(output_path)
    };

    match run.await {
        Ok(output_path) => {
            tracing::info!("✅ Export completed successfully!");
            println!("✅ ShapedDevices export completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
