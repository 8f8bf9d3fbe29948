//! `sift ask` — Answer a question, or enter interactive mode.

use sift_agent::SearchLoop;
use sift_config::SiftConfig;
use sift_reasoner::GeminiReasoner;
use std::io::Write;
use std::sync::Arc;

pub async fn run(
    query: Option<String>,
    context: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SiftConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API keys early — give a clear error
    if config.reasoner.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No Gemini API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export GEMINI_API_KEY='...'");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", SiftConfig::default_path().display());
        eprintln!();
        eprintln!("  Get a key at: https://aistudio.google.com/apikey");
        eprintln!();
        return Err("No Gemini API key found. See above for setup instructions.".into());
    }
    if config.search.google_api_key.is_none() || config.search.google_search_engine_id.is_none() {
        eprintln!();
        eprintln!("  ERROR: Google Custom Search is not configured!");
        eprintln!();
        eprintln!("  Set both environment variables:");
        eprintln!("    export GOOGLE_API_KEY='...'");
        eprintln!("    export GOOGLE_SEARCH_ENGINE_ID='...'");
        eprintln!();
        return Err("Google Custom Search not configured. See above for setup instructions.".into());
    }

    let reasoner = Arc::new(GeminiReasoner::from_config(&config.reasoner)?);
    let backends = sift_backends::backend_set(&config.search)?;
    let agent = SearchLoop::new(backends, reasoner, config.agent.clone())
        .with_num_results(config.search.num_results);

    if let Some(query) = query {
        let context = context.unwrap_or_default();

        eprint!("  Searching...");
        let session = agent.run_session(&query, &context).await;
        eprint!("\r             \r");
        print_session(&session, json)?;
    } else {
        // Interactive mode
        println!();
        println!("  Sift — Interactive Mode");
        println!("  Model: {}", config.reasoner.model);
        println!();
        println!("  Type a question and press Enter.");
        println!("  Type 'exit' or Ctrl+C to quit.");
        println!();

        let stdin = std::io::stdin();
        loop {
            print!("  You > ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                break;
            }
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
                break;
            }

            eprint!("  ...");
            let session = agent.run_session(question, "").await;
            eprint!("\r     \r");
            println!();
            print_session(&session, json)?;
            println!();
        }
    }

    Ok(())
}

fn print_session(
    session: &sift_core::SearchSession,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }

    let Some(answer) = session.terminal_answer.as_ref() else {
        // The loop always finishes sessions; this is just belt and braces.
        println!("(no answer)");
        return Ok(());
    };

    println!("{}", answer.text);
    if !answer.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &answer.sources {
            println!("  - {} ({})", source.title, source.url);
        }
    }
    Ok(())
}
