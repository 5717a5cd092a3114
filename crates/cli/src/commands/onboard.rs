//! `webscout onboard` — First-time setup.

use std::path::Path;
use webscout_config::AppConfig;

pub async fn run(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::default_path);

    println!("WebScout — First-Time Setup");
    println!("===========================\n");

    if config_path.exists() && !force {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or re-run with --force to overwrite.\n");
        return Ok(());
    }

    AppConfig::write_default(&config_path)?;
    println!("  Created config at: {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Add your model API key (api_key) or set OPENAI_API_KEY");
    println!("  2. Add your search API key ([search] api_key) or set SERPER_DEV_API_KEY");
    println!("  3. Run: webscout ask\n");

    Ok(())
}
