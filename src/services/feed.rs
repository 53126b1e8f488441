use secrecy::Secret;

use crate::auth::AuthenticatedUser;
use crate::backend::{BackendError, SupabaseClient};
use crate::legacy::LegacyApiClient;
use crate::model::Article;

/// # Where the feed gets its articles from
///
/// Chosen once from the configuration, the two variants never serve the same process.
pub enum ArticleSource {
    /// `articles` collection of the hosted backend, read with the user's session
    Hosted,
    /// `/articles` endpoint of the legacy API
    Legacy(LegacyApiClient),
}

impl ArticleSource {
    pub async fn list_articles(
        &self,
        backend: &SupabaseClient,
        access_token: &Secret<String>,
    ) -> Result<Vec<Article>, BackendError> {
        match self {
            ArticleSource::Hosted => backend.list_articles(access_token).await,
            ArticleSource::Legacy(client) => client.list_articles().await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArticleSource::Hosted => "hosted",
            ArticleSource::Legacy(_) => "legacy",
        }
    }
}

/// # What the feed page ends up showing
#[derive(Debug, PartialEq)]
pub enum FeedState {
    /// At least one article, most recently published first
    Populated(Vec<Article>),
    /// The source has no article
    Empty,
    /// The source could not be read
    Unavailable,
}

impl FeedState {
    pub fn articles(&self) -> &[Article] {
        match self {
            FeedState::Populated(articles) => articles,
            FeedState::Empty | FeedState::Unavailable => &[],
        }
    }
}

/// # Load the articles of the feed
///
/// A failure is logged and turned into [`FeedState::Unavailable`], it never fails the page.
#[tracing::instrument(skip_all, fields(user_id = %user.id, source = source.name()))]
pub async fn load_feed(
    source: &ArticleSource,
    backend: &SupabaseClient,
    user: &AuthenticatedUser,
) -> FeedState {
    match source.list_articles(backend, &user.access_token).await {
        Ok(articles) => feed_state(articles),
        Err(error) => {
            tracing::error!(%error, "Failed to fetch articles");
            FeedState::Unavailable
        }
    }
}

fn feed_state(mut articles: Vec<Article>) -> FeedState {
    if articles.is_empty() {
        return FeedState::Empty;
    }

    newest_first(&mut articles);
    FeedState::Populated(articles)
}

/// Order by publication time, most recent first. Ties keep the source order.
pub fn newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
