//! `webscout doctor` — Diagnose configuration and connectivity.

use std::path::Path;
use webscout_config::AppConfig;
use webscout_core::provider::Provider;
use webscout_providers::build_from_config;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("WebScout Doctor — System Diagnostics");
    println!("====================================\n");

    let mut issues = 0;

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_path);
    if path.exists() {
        println!("  [ok]   Config file: {}", path.display());
    } else {
        println!("  [warn] No config file at {} (defaults in use; run `webscout onboard`)", path.display());
    }

    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  [ok]   Config valid");
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            println!("\n  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    println!("         Provider: {} / model {}", config.provider, config.model);
    println!("         Iteration budget: {}", config.max_iterations);

    if config.api_key.is_some() {
        println!("  [ok]   Model API key configured");
    } else {
        println!("  [fail] No model API key (set api_key or OPENAI_API_KEY)");
        issues += 1;
    }

    if config.search.api_key.is_some() {
        println!("  [ok]   Search API key configured");
    } else {
        println!("  [fail] No search API key (set [search] api_key or SERPER_DEV_API_KEY)");
        issues += 1;
    }

    let provider = build_from_config(&config);
    match provider.health_check().await {
        Ok(true) => println!("  [ok]   Provider reachable"),
        Ok(false) => {
            println!("  [fail] Provider responded but reported unhealthy");
            issues += 1;
        }
        Err(e) => {
            println!("  [fail] Provider unreachable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
