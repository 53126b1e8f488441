use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_tracing::TracingMiddleware;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::configuration::SupabaseSettings;
use crate::model::{Article, AuthUser, ProfileName, Session, SignUpOutcome};

const ARTICLE_COLUMNS: &str = "id,title,summary,url,source,published_at,created_at";
const PROFILE_COLUMNS: &str = "name";

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("Could not reach the backend: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend answered {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Could not encode the request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BackendError {
    /// Message fit to be shown to the user on a form
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
            BackendError::Status { .. } => "The request was rejected".to_owned(),
            _ => "Could not reach the authentication service, please retry later".to_owned(),
        }
    }
}

/// Error bodies of the auth and data APIs. Which field is set depends on the endpoint.
#[derive(Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// # Handle to the hosted backend
///
/// Wraps the auth API (`/auth/v1`) and the data API (`/rest/v1`) of a Supabase project.
/// Built once at startup and shared through the application state.
pub struct SupabaseClient {
    http: ClientWithMiddleware,
    base_url: Url,
    anon_key: Secret<String>,
}

impl SupabaseClient {
    pub fn new(
        settings: &SupabaseSettings,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::with_client(
            tracing_client(client),
            settings.url.clone(),
            Secret::new(settings.anon_key.expose_secret().clone()),
        ))
    }

    pub fn with_client(http: ClientWithMiddleware, base_url: Url, anon_key: Secret<String>) -> Self {
        Self {
            http,
            base_url,
            anon_key,
        }
    }

    /// Create an account. The display name goes into the user metadata, from where the
    /// backend provisions the profile.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &Secret<String>,
        name: Option<&str>,
    ) -> Result<SignUpOutcome, BackendError> {
        let mut body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        if let Some(name) = name {
            body["data"] = json!({ "name": name });
        }

        let url = self.endpoint("auth/v1/signup")?;
        let request = self.anonymous(self.http.post(url));
        let response = send_json(request, &body).await?;

        Ok(checked(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &Secret<String>,
    ) -> Result<Session, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let credentials = Credentials {
            email,
            password: password.expose_secret(),
        };
        let request = self.anonymous(self.http.post(url));
        let response = send_json(request, &credentials).await?;

        Ok(checked(response).await?.json().await?)
    }

    /// Resolve the user owning an access token
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn get_user(&self, access_token: &Secret<String>) -> Result<AuthUser, BackendError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .authenticated(self.http.get(url), access_token)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    /// Revoke the session owning the access token
    #[tracing::instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &Secret<String>) -> Result<(), BackendError> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .authenticated(self.http.post(url), access_token)
            .send()
            .await?;

        checked(response).await?;
        Ok(())
    }

    /// Fetch the name on the profile of a user, `None` when there is no profile
    #[tracing::instrument(skip(self, access_token), level = "debug")]
    pub async fn fetch_profile(
        &self,
        access_token: &Secret<String>,
        user_id: &Uuid,
    ) -> Result<Option<ProfileName>, BackendError> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("select", PROFILE_COLUMNS)
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("limit", "1");

        let response = self
            .authenticated(self.http.get(url), access_token)
            .send()
            .await?;
        let profiles: Vec<ProfileName> = checked(response).await?.json().await?;

        Ok(profiles.into_iter().next())
    }

    /// All the articles, most recently published first
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn list_articles(
        &self,
        access_token: &Secret<String>,
    ) -> Result<Vec<Article>, BackendError> {
        let mut url = self.endpoint("rest/v1/articles")?;
        url.query_pairs_mut()
            .append_pair("select", ARTICLE_COLUMNS)
            .append_pair("order", "published_at.desc");

        let response = self
            .authenticated(self.http.get(url), access_token)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    /// Count the articles without fetching any row.
    ///
    /// Returns `None` when the backend answers without an exact total.
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn count_articles(&self) -> Result<Option<u64>, BackendError> {
        let mut url = self.endpoint("rest/v1/articles")?;
        url.query_pairs_mut().append_pair("select", "count");

        let response = self
            .anonymous(self.http.head(url))
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = checked(response).await?;

        Ok(response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total))
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(join_path(&self.base_url, path)?)
    }

    fn anonymous(&self, request: RequestBuilder) -> RequestBuilder {
        self.authenticated(request, &self.anon_key)
    }

    fn authenticated(&self, request: RequestBuilder, token: &Secret<String>) -> RequestBuilder {
        request
            .header("apikey", self.anon_key.expose_secret())
            .header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
    }
}

/// Join a relative path to a base URL, keeping any path prefix of the base
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(path)
}

/// Wrap a client so that every outgoing request is traced
pub fn tracing_client(client: reqwest::Client) -> ClientWithMiddleware {
    ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .build()
}

async fn send_json<T: Serialize + ?Sized>(
    request: RequestBuilder,
    body: &T,
) -> Result<Response, BackendError> {
    let body = serde_json::to_vec(body)?;
    Ok(request
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(body)
        .send()
        .await?)
}

/// Turn a non success response into a [`BackendError::Status`]
pub(crate) async fn checked(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_default();

    Err(BackendError::Status { status, message })
}

/// Extract the total of a `Content-Range` header such as `0-24/573` or `*/0`
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
