use std::net::TcpListener;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};

use crate::backend::SupabaseClient;
use crate::configuration::{FeedSourceSettings, RateLimitingSettings, Settings};
use crate::legacy::LegacyApiClient;
use crate::routes;
use crate::services::feed::ArticleSource;
use crate::templates::Templates;

/// # Everything the handlers share
///
/// Built once from the validated configuration and handed to every worker.
pub struct AppState {
    pub backend: SupabaseClient,
    pub article_source: ArticleSource,
    pub templates: Templates,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let backend = SupabaseClient::new(&settings.supabase, settings.backend_timeout)
            .context("Could not build the backend client")?;

        let article_source = match &settings.feed_source {
            FeedSourceSettings::Hosted => ArticleSource::Hosted,
            FeedSourceSettings::Legacy { api_url } => ArticleSource::Legacy(
                LegacyApiClient::new(api_url.clone(), settings.backend_timeout)
                    .context("Could not build the legacy API client")?,
            ),
        };

        Ok(AppState {
            backend,
            article_source,
            templates: Templates::new().context("Could not load the templates")?,
            secure_cookies: settings.secure_cookies,
        })
    }
}

pub async fn startup(
    app_state: AppState,
    rate_limiting: RateLimitingSettings,
    listener: TcpListener,
) -> anyhow::Result<()> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rate_limiting.per_second)
        .burst_size(rate_limiting.burst_size)
        .finish()
        .ok_or_else(|| anyhow!("Rate limiting values must be greater than zero"))?;

    let app_state = Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(actix_files::Files::new("/static", "./static/"))
    })
    .listen(listener)?
    .run()
    .await?;

    Ok(())
}
