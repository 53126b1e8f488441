use std::future::Future;
use std::pin::Pin;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{dev, FromRequest, HttpRequest, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

use crate::backend::BackendError;
use crate::model::Session;
use crate::routes::redirect;
use crate::startup::AppState;

/// Cookie holding the access token of the current session
pub const SESSION_COOKIE: &str = "fetch-access-token";
/// Where the visitors without a session are sent
pub const LOGIN_ROUTE: &str = "/auth/login";

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("No session cookie")]
    MissingSession,
    #[error("Session rejected by the backend: {0}")]
    Rejected(#[from] BackendError),
    #[error("Application state is not registered")]
    MissingState,
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthenticationError::MissingState => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::SEE_OTHER,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AuthenticationError::MissingSession => redirect(LOGIN_ROUTE).finish(),
            // Drop the stale token so the next visit does not check it again
            AuthenticationError::Rejected(error) if is_invalid_session(error) => {
                redirect(LOGIN_ROUTE).cookie(removal_cookie()).finish()
            }
            // Outage or transport failure, the session may still be good
            AuthenticationError::Rejected(_) => redirect(LOGIN_ROUTE).finish(),
            AuthenticationError::MissingState => HttpResponse::InternalServerError().finish(),
        }
    }
}

/// Whether the backend refused the token itself, as opposed to failing to check it
fn is_invalid_session(error: &BackendError) -> bool {
    match error {
        BackendError::Status { status, .. } => {
            *status == reqwest::StatusCode::UNAUTHORIZED || *status == reqwest::StatusCode::FORBIDDEN
        }
        _ => false,
    }
}

/// # A visitor holding a session the backend accepted
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: Secret<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthenticationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    #[tracing::instrument(skip_all)]
    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let result = extract_authenticated_user(&req).await;
            if let Err(error) = &result {
                tracing::debug!(%error, "Visitor is not logged in");
            }
            result
        })
    }
}

/// # Resolve the session carried by the request
///
/// Any failure, a transient one included, means "not logged in". There is no retry.
async fn extract_authenticated_user(
    req: &HttpRequest,
) -> Result<AuthenticatedUser, AuthenticationError> {
    let access_token = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
        .map(Secret::new)
        .ok_or(AuthenticationError::MissingSession)?;

    let app_state = req
        .app_data::<Data<AppState>>()
        .ok_or(AuthenticationError::MissingState)?;

    let user = app_state.backend.get_user(&access_token).await?;

    Ok(AuthenticatedUser {
        id: user.id,
        email: user.email,
        access_token,
    })
}

/// Cookie storing a freshly issued session. It expires with the access token.
pub fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session.access_token.expose_secret().clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(session.expires_in.max(0)))
        .finish()
}

/// Cookie telling the browser to forget the session
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}
