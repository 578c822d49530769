use anyhow::Context;
use bondbook::marketdata::HttpQuoteSource;
use bondbook::{api, config::Config, db::init_db, QuoteSource, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let port = config.port;

    let pool = init_db(&config.database_path)
        .await
        .context("initializing order store")?;

    let repo = Arc::new(Repository::new(pool));
    let quotes: Arc<dyn QuoteSource> =
        Arc::new(HttpQuoteSource::new(config.market_data_url.clone()));

    let app = api::create_router(api::AppState::new(repo, config, quotes));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("serving requests")?;

    Ok(())
}
