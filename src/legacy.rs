use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use url::Url;

use crate::backend::{checked, join_path, tracing_client, BackendError};
use crate::model::{timestamp, Article};

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    articles: Vec<LegacyArticle>,
}

#[derive(Debug, Deserialize)]
struct LegacyArticle {
    id: i64,
    title: String,
    summary: String,
    url: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    published_at: DateTime<Utc>,
}

impl From<LegacyArticle> for Article {
    fn from(article: LegacyArticle) -> Self {
        Article {
            id: article.id.to_string(),
            title: article.title,
            summary: Some(article.summary),
            url: article.url,
            source: None,
            published_at: article.published_at,
            created_at: article.published_at,
        }
    }
}

/// # Client of the custom API that served articles before the hosted backend
pub struct LegacyApiClient {
    http: ClientWithMiddleware,
    base_url: Url,
}

impl LegacyApiClient {
    pub fn new(base_url: Url, timeout: Option<std::time::Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(tracing_client(builder.build()?), base_url))
    }

    pub fn with_client(http: ClientWithMiddleware, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// `GET {API_URL}/articles`, in whatever order the API returns them
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url), level = "debug")]
    pub async fn list_articles(&self) -> Result<Vec<Article>, BackendError> {
        let url = join_path(&self.base_url, "articles")?;
        let response = self.http.get(url).send().await?;
        let body: ArticlesResponse = checked(response).await?.json().await?;

        Ok(body.articles.into_iter().map(Article::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn legacy_payload_converts_to_articles() {
        let body: ArticlesResponse = serde_json::from_value(json!({
            "articles": [{
                "id": 1,
                "title": "Welcome to FETCH!",
                "summary": "This is a placeholder article.",
                "url": "https://example.com",
                "published_at": "2025-11-18T00:00:00Z"
            }],
            "total": 1
        }))
        .unwrap();

        let articles: Vec<Article> = body.articles.into_iter().map(Article::from).collect();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "1");
        assert_eq!(articles[0].summary.as_deref(), Some("This is a placeholder article."));
        assert_eq!(articles[0].source, None);
        assert_eq!(articles[0].created_at, articles[0].published_at);
    }
}
