use clap::Parser;
use go_scaffold::utils::{logger, validation::Validate};
use go_scaffold::{CliConfig, ScaffoldEngine, ScaffoldError, SystemToolRunner, TemplatePipeline};
use std::io;

fn report(e: &ScaffoldError) {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load_template_config() {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        report(&e);
        std::process::exit(1);
    }

    let request = {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut writer = io::stdout();
        match cli.resolve_request(&config, &mut reader, &mut writer) {
            Ok(request) => request,
            Err(e) => {
                report(&e);
                std::process::exit(1);
            }
        }
    };

    let pipeline = match TemplatePipeline::new(&config, SystemToolRunner::new()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };
    let engine =
        ScaffoldEngine::new(pipeline).with_cleanup_on_failure(config.project.cleanup_on_failure);

    match engine.run(&request).await {
        Ok(outcome) => {
            tracing::info!(
                "📁 Project created at {} ({} files, {} replacements)",
                outcome.project_dir.display(),
                outcome.install.files_written,
                outcome.rewrite.replacements
            );
            println!("Project initialized successfully!");
        }
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }

    Ok(())
}
