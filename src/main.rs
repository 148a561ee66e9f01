use clap::Parser;
use letterconv::utils::logger;
use letterconv::{CliConfig, ImdbConverter};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger();

    tracing::info!("Starting letterconv");
    tracing::debug!("CLI config: {:?}", config);

    let output = config.output_file();
    let result = ImdbConverter::new(&config.input_file).and_then(|c| c.convert(&output));

    match result {
        Ok(summary) => {
            println!("✅ Converted {} rows", summary.rows);
            println!("📁 Output saved to: {}", summary.output.display());
        }
        Err(e) => {
            tracing::error!("❌ Conversion failed: {} (Kind: {})", e, e.kind());

            eprintln!("❌ {}", e);
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
