use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::routes::{html, PageError};
use crate::services::probe::{probe_backend, BackendStatus};
use crate::startup::AppState;

#[derive(Serialize)]
struct Highlight {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
}

static HIGHLIGHTS: [Highlight; 3] = [
    Highlight {
        icon: "🎯",
        title: "Curated Content",
        description: "Articles tailored to your interests",
    },
    Highlight {
        icon: "🔍",
        title: "Information Trails",
        description: "Discover connected ideas",
    },
    Highlight {
        icon: "📱",
        title: "Anywhere, Anytime",
        description: "Works on all your devices",
    },
];

#[derive(Serialize)]
struct LandingPage {
    title: &'static str,
    status: BackendStatus,
    status_message: &'static str,
    highlights: &'static [Highlight],
}

#[get("/")]
#[tracing::instrument(skip(app_state))]
pub async fn landing(app_state: web::Data<AppState>) -> Result<HttpResponse, PageError> {
    let status = probe_backend(&app_state.backend).await;

    let page = LandingPage {
        title: "FETCH - Your Personalized Content Curator",
        status,
        status_message: status.message(),
        highlights: &HIGHLIGHTS,
    };

    Ok(html(
        StatusCode::OK,
        app_state.templates.render("landing", &page)?,
    ))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing);
}
