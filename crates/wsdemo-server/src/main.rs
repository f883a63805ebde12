mod configuration;
mod error;
mod routes;
mod state;

use configuration::Settings;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wsdemo::{prompt_store::PromptStore, providers::factory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        println!("Loaded environment from {:?}", path);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let settings = Settings::new()?;
    let addr = settings.server.socket_addr()?;
    let cors = settings.cors.layer()?;

    let provider_config = settings.provider.into_config();
    let provider_type = provider_config.provider_type();
    let provider = factory::get_provider(provider_config)?;
    info!(
        "using {} provider, default model {}",
        provider_type,
        provider.default_model()
    );

    let prompts = PromptStore::new(&settings.prompts.dir);
    match prompts.list() {
        Ok(names) => info!("found {} prompts in {:?}", names.len(), prompts.dir()),
        Err(e) => warn!("prompts directory {:?} is not readable: {}", prompts.dir(), e),
    }

    let state = state::AppState::new(provider, prompts);
    let app = routes::configure(state).layer(cors);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;
    info!("server stopped");
    Ok(())
}
