//! Engine Agent HTTP server

use clap::Parser;
use engine_agent::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    router::IntentRouter,
    session::SubscriptionState,
    telemetry,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { output }) => {
            let template = generate_config_template();
            match output {
                Some(path) => {
                    std::fs::write(&path, template)?;
                    eprintln!("Configuration template written to {}", path);
                }
                None => print!("{}", template),
            }
            Ok(())
        }
        Some(Command::Route { prompt, without }) => route_once(&cli.config, &prompt, &without),
        None => serve(&cli.config).await,
    }
}

/// Route one prompt and print the decision as JSON
fn route_once(
    config_path: &str,
    prompt: &str,
    without: &[engine_agent::providers::ProviderId],
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    let router = IntentRouter::from_config(&config)?;
    let mut subscriptions: SubscriptionState = config.subscriptions;
    for provider in without {
        subscriptions.set(*provider, false);
    }

    let (decision, scores) = router.route_with_scores(prompt, &subscriptions)?;
    let output = serde_json::json!({
        "routing": decision,
        "scores": scores,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn serve(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_file(config_path)?;

    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting Engine Agent server on {}:{}",
        config.server.host,
        config.server.port
    );

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    let state = AppState::new(Arc::new(config))?;
    let app = handlers::app(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("UI available at http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
