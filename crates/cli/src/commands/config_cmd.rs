//! `sift config` — Configuration management commands.

use sift_config::SiftConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match SiftConfig::load() {
        Ok(config) => {
            println!("  ok: config parsed successfully");

            let mut warnings = Vec::new();

            if config.reasoner.api_key.is_none() {
                warnings.push("No Gemini API key set (set GEMINI_API_KEY)");
            }
            if config.search.google_api_key.is_none() {
                warnings.push("No Google API key set (set GOOGLE_API_KEY)");
            }
            if config.search.google_search_engine_id.is_none() {
                warnings.push("No search engine ID set (set GOOGLE_SEARCH_ENGINE_ID)");
            }
            if config.search.num_results > 10 {
                warnings.push("num_results above 10 is capped by the Custom Search API");
            }

            if warnings.is_empty() {
                println!("  ok: all checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("  warning: {w}");
                }
            }

            println!();
            println!("  Model:          {}", config.reasoner.model);
            println!("  Results/search: {}", config.search.num_results);
            println!("  Max iterations: {}", config.agent.max_iterations);
            println!(
                "  Exhaustion at:  {} attempts",
                config.agent.exhaustion_threshold()
            );
            println!("  Min confidence: {}", config.agent.min_confidence);
        }
        Err(e) => {
            println!("  error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SiftConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Never print secrets, even to a terminal.
    config.reasoner.api_key = config.reasoner.api_key.map(|_| "[REDACTED]".into());
    config.search.google_api_key = config.search.google_api_key.map(|_| "[REDACTED]".into());
    config.search.google_search_engine_id = config
        .search
        .google_search_engine_id
        .map(|_| "[REDACTED]".into());

    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", SiftConfig::default_path().display());
    Ok(())
}
