use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tweetalchemy_server::{
    AppState,
    config::{ServerArgs, Settings},
    serve,
    upstream::OpenAiCompatClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = match Settings::try_from(ServerArgs::parse()) {
        Ok(settings) => settings,
        Err(err) => {
            error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let client = match OpenAiCompatClient::new(&settings.base_url, settings.api_key.clone()) {
        Ok(client) => client,
        Err(err) => {
            error!("invalid completion endpoint {}: {}", settings.base_url, err);
            std::process::exit(1);
        }
    };
    info!("using model {} at {}", settings.model, client.endpoint());

    let listener = match tokio::net::TcpListener::bind(&settings.bind_address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {}", settings.bind_address, err);
            std::process::exit(1);
        }
    };

    info!("server starting on {}", settings.bind_address);
    let state = AppState::new(Arc::new(client), settings.model);
    if let Err(err) = serve(listener, state).await {
        warn!("server exited: {}", err);
    }
}
