//! `sift doctor` — Diagnose configuration and connectivity.

use sift_config::SiftConfig;
use sift_core::Reasoner;
use sift_reasoner::GeminiReasoner;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sift Doctor — Diagnostics");
    println!("=========================\n");

    let mut issues = 0;

    let config_path = SiftConfig::default_path();
    if config_path.exists() {
        println!("  ok: config file present at {}", config_path.display());
    } else {
        println!("  note: no config file — using defaults + environment");
    }

    let config = match SiftConfig::load() {
        Ok(config) => {
            println!("  ok: config valid");
            config
        }
        Err(e) => {
            println!("  fail: config invalid: {e}");
            println!("\n  1 issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    if config.reasoner.api_key.is_some() {
        println!("  ok: Gemini API key configured");

        match GeminiReasoner::from_config(&config.reasoner) {
            Ok(reasoner) => match reasoner.health_check().await {
                Ok(true) => println!("  ok: reasoner reachable ({})", config.reasoner.model),
                Ok(false) => {
                    println!("  fail: reasoner responded but is unhealthy");
                    issues += 1;
                }
                Err(e) => {
                    println!("  fail: reasoner unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  fail: could not build reasoner client: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  fail: no Gemini API key — set GEMINI_API_KEY");
        issues += 1;
    }

    if config.search.google_api_key.is_some() && config.search.google_search_engine_id.is_some() {
        println!("  ok: Google Custom Search configured");
    } else {
        println!("  fail: Google Custom Search incomplete — set GOOGLE_API_KEY and GOOGLE_SEARCH_ENGINE_ID");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
