use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::model::Article;
use crate::routes::{html, PageError};
use crate::services::feed::{load_feed, FeedState};
use crate::services::profiles::resolve_display_name;
use crate::startup::AppState;

#[derive(Serialize, Debug)]
struct ArticleView<'a> {
    id: &'a str,
    title: &'a str,
    summary: Option<&'a str>,
    url: &'a str,
    source: Option<&'a str>,
    /// Human readable publication date
    published: String,
    published_iso: String,
}

impl<'a> From<&'a Article> for ArticleView<'a> {
    fn from(article: &'a Article) -> Self {
        ArticleView {
            id: &article.id,
            title: &article.title,
            summary: article.summary.as_deref().filter(|s| !s.is_empty()),
            url: &article.url,
            source: article.source.as_deref().filter(|s| !s.is_empty()),
            published: article.published_at.format("%b %-d, %Y").to_string(),
            published_iso: article.published_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Debug)]
struct FeedPage<'a> {
    title: &'static str,
    display_name: &'a str,
    articles: Vec<ArticleView<'a>>,
    empty: bool,
    unavailable: bool,
}

impl<'a> FeedPage<'a> {
    fn new(display_name: &'a str, state: &'a FeedState) -> Self {
        FeedPage {
            title: "Your Feed - FETCH",
            display_name,
            articles: state.articles().iter().map(ArticleView::from).collect(),
            empty: matches!(state, FeedState::Empty),
            unavailable: matches!(state, FeedState::Unavailable),
        }
    }
}

/// # Feed of the logged in user
///
/// Visitors without a valid session are redirected to the login page by the
/// [`AuthenticatedUser`] extractor, before anything is fetched.
#[get("/feed")]
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn feed(
    user: AuthenticatedUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, PageError> {
    let (display_name, state) = tokio::join!(
        resolve_display_name(&app_state.backend, &user),
        load_feed(&app_state.article_source, &app_state.backend, &user),
    );

    let page = FeedPage::new(&display_name, &state);

    Ok(html(
        StatusCode::OK,
        app_state.templates.render("feed", &page)?,
    ))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(feed);
}
