use clap::Parser;
use steam_sorter::config::cli::LogFormat;
use steam_sorter::utils::logger;
use steam_sorter::{CliConfig, EtlEngine, SteamPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting steam-sorter");

    // 驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    tracing::debug!(
        "Run config: {} accounts, tie-break {}, {} concurrent lookups, retry {:?}",
        config.account_ids.len(),
        config.tie_break,
        config.concurrent_requests,
        config.retry
    );

    let engine = EtlEngine::new(SteamPipeline::from_config(config));

    match engine.run().await {
        Ok(outcome) => {
            let summary = &outcome.summary;
            tracing::info!(
                "✅ Analysis complete in {}s",
                (summary.finished_at - summary.started_at).num_seconds()
            );
            println!("✅ Analysis complete!");
            println!("📁 Results saved to: {}", outcome.output_path);
            println!(
                "🎮 {} games ranked, {} without completion data",
                summary.resolved,
                summary.unresolved()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
