use actix_web::http::header::{ContentType, LOCATION};
use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse, HttpResponseBuilder, ResponseError};
use serde_json::json;

pub mod auth;
pub mod feed;
pub mod landing;

#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error("Could not render the page: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl ResponseError for PageError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "Page failed");
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .content_type(ContentType::plaintext())
            .body("Something went wrong, please retry later")
    }
}

/// Build an HTML response out of a rendered page
pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponseBuilder::new(status)
        .content_type(ContentType::html())
        .body(body)
}

/// `303 See Other` towards `location`, to be completed with cookies
pub(crate) fn redirect(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((LOCATION, location));
    builder
}

#[get("/health")]
#[tracing::instrument]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .configure(landing::configure)
        .configure(auth::configure)
        .configure(feed::configure);
}
