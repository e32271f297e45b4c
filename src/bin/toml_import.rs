use clap::Parser;
use product_normalizer::core::{ConfigProvider, Pipeline};
use product_normalizer::utils::error::ErrorSeverity;
use product_normalizer::utils::{logger, validation::Validate};
use product_normalizer::{ImportEngine, ImportPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-import")]
#[command(about = "Product import driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "import-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Normalize the input and report counts without writing any files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based product import");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ImportPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        return perform_dry_run(&pipeline).await;
    }

    let engine = ImportEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Import completed successfully!");
            println!("✅ Import completed successfully!");
            println!(
                "📦 {} products, {} rows, {} diagnostics",
                summary.product_count, summary.row_count, summary.diagnostic_count
            );
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0.1.0")
    );
    println!("  Mode: {}", config.source.mode);
    println!("  Input: {}", config.source.input_path);
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Default vendor: {}", config.transform.defaults.vendor);

    if !config.source.aliases.is_empty() {
        println!("  Extra aliases:");
        for (field, names) in &config.source.aliases {
            println!("    {} <- {}", field, names.join(", "));
        }
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(
    pipeline: &ImportPipeline<LocalStorage, TomlConfig>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");

    let records = pipeline.extract().await?;
    println!("  📥 Records read: {}", records.len());

    let result = pipeline.transform(records).await?;
    println!("  📦 Products: {}", result.product_count);
    println!("  📄 Rows: {}", result.rows.len());

    if !result.diagnostics.is_empty() {
        println!();
        println!("⚠️ Diagnostics:");
        for diagnostic in &result.diagnostics {
            println!("  {}", diagnostic);
        }
    }

    println!();
    println!("✅ Dry run complete. Nothing was written.");

    Ok(())
}
