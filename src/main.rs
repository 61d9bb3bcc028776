use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reelscout::config::Config;
use reelscout::services::{BackendClient, ProxyMetadataClient};
use reelscout::session::{Session, SessionOutcome};
use reelscout::ui::{ConsoleView, InputGate};

/// Movie recommendation client for a similarity backend
#[derive(Parser, Debug)]
#[command(name = "reelscout", version, about)]
struct Cli {
    /// Movie title to search; starts an interactive prompt when omitted
    title: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let metadata = Arc::new(ProxyMetadataClient::new(
        http_client.clone(),
        config.backend_url.clone(),
    ));
    let backend = Arc::new(BackendClient::new(http_client, config.backend_url.clone()));
    let session = Session::new(
        metadata,
        backend,
        Arc::new(ConsoleView),
        config.image_base_url.clone(),
    );

    match cli.title {
        Some(title) => match session.run(&title).await {
            SessionOutcome::Failed(e) => Err(e.into()),
            _ => Ok(()),
        },
        None => interactive_loop(&session).await,
    }
}

/// Prompt loop: gated submission, plus numbered re-entry into the last
/// result's recommendations.
async fn interactive_loop(session: &Session) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut gate = InputGate::new();
    let mut last_recommendations: Vec<String> = Vec::new();

    println!("Enter a movie title ('quit' to exit).");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        gate.on_input(line);
        let Some(query) = gate.try_submit() else {
            println!("Enter a non-empty movie title.");
            continue;
        };

        // A bare number re-enters the pipeline with that recommendation
        let query = match query.parse::<usize>() {
            Ok(n) if (1..=last_recommendations.len()).contains(&n) => {
                last_recommendations[n - 1].clone()
            }
            _ => query,
        };

        if let SessionOutcome::Rendered(page) = session.run(&query).await {
            println!("Recommendations for {}:", page.title);
            for (i, title) in page.recommendations.iter().enumerate() {
                println!("  {}. {}", i + 1, title);
            }
            println!("Type a number to explore a recommendation.");
            last_recommendations = page.recommendations;
        }
    }

    Ok(())
}
