use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ai_client::Gemini;
use whatsapp_client::WhatsAppClient;

use prenda_core::{
    CartLifecycle, CatalogQueries, ChatService, Config, LlmAgent, PgCarts, PgCatalog,
};
use prenda_server::rest::AppState;
use prenda_server::routes;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting prenda-server");

    let config = Config::from_env();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    let agent: Arc<dyn LlmAgent> =
        Arc::new(Gemini::new(&config.gemini_api_key, &config.gemini_model));
    let catalog: Arc<dyn CatalogQueries> = Arc::new(PgCatalog::new(pool.clone()));
    let carts: Arc<dyn CartLifecycle> = Arc::new(PgCarts::new(pool));
    let whatsapp = Arc::new(WhatsAppClient::new(
        &config.wp_access_token,
        &config.wp_phone_number_id,
    ));

    let chat = ChatService::new(agent.clone(), catalog.clone(), carts.clone());

    let state = Arc::new(AppState {
        chat,
        agent,
        catalog,
        carts,
        whatsapp,
        verify_token: config.wp_verify_token.clone(),
    });

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
