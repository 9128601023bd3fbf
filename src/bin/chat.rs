use study_relay::{
    actuators::chat::back::{Relay, serve},
    config::{self, back_shared},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    config::validate();

    serve(Relay::from_env(), *back_shared::PORT, &back_shared::PUBLIC_DIR).await
}
