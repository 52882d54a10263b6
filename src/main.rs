use tokio::net::TcpListener;
use tracing::info;
use wandermap::config::AppConfig;
use wandermap::error::AppError;
use wandermap::routes::create_router;
use wandermap::services::{geocode::GeocodeService, store::TripStore};
use wandermap::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    let store = TripStore::open(config.db_file.clone()).await?;
    let geocoder = GeocodeService::new(config.mapbox_token.clone())?;

    let state = AppState::new(config.clone(), store, geocoder);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,wandermap=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
