//! `sift init` — First-time setup.

use sift_config::SiftConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = SiftConfig::default_path();

    println!("Sift — First-Time Setup");
    println!("=======================\n");

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    let config = SiftConfig::default();
    config.save_to(&config_path)?;
    println!("Created config at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. export GEMINI_API_KEY='...'            (https://aistudio.google.com/apikey)");
    println!("  2. export GOOGLE_API_KEY='...'            (Custom Search JSON API)");
    println!("  3. export GOOGLE_SEARCH_ENGINE_ID='...'   (Programmable Search Engine)");
    println!("  4. Run: sift ask \"your question\"");
    println!();

    Ok(())
}
