use std::net::TcpListener;

use tracing::{error, info};

use fetch_web::configuration::{LogFormat, Settings};
use fetch_web::observability;
use fetch_web::startup::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init dotenv
    dotenvy::dotenv().ok();

    let subscriber = observability::get_subscriber("fetch_web", "info", LogFormat::from_env());
    observability::init_subscriber(subscriber)?;

    // Missing backend coordinates are fatal, nothing works without them
    let settings = Settings::from_env().map_err(|error| {
        error!(%error, "Invalid configuration");
        error
    })?;

    let app_state = AppState::from_settings(&settings)?;
    let listener = TcpListener::bind(&settings.listen_on)?;

    info!(
        listen_on = %settings.listen_on,
        feed_source = app_state.article_source.name(),
        "FETCH is starting"
    );

    let result = startup::startup(app_state, settings.rate_limiting, listener).await;
    observability::shutdown();

    result
}
