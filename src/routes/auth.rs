use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use crate::auth::{removal_cookie, session_cookie, SESSION_COOKIE};
use crate::model::SignUpOutcome;
use crate::routes::{html, redirect, PageError};
use crate::startup::AppState;

const FEED_ROUTE: &str = "/feed";
const HOME_ROUTE: &str = "/";
const CONFIRMATION_NOTICE: &str =
    "Almost there! Check your email to confirm your account, then sign in.";

#[derive(Deserialize, Debug)]
pub struct LoginForm {
    email: String,
    password: Secret<String>,
}

#[derive(Deserialize, Debug)]
pub struct SignupForm {
    #[serde(default)]
    name: String,
    email: String,
    password: Secret<String>,
}

/// Values shared by the login and signup pages
#[derive(Serialize, Default)]
struct AuthPage<'a> {
    title: &'static str,
    email: &'a str,
    name: &'a str,
    error: Option<String>,
    notice: Option<&'static str>,
}

impl<'a> AuthPage<'a> {
    fn login() -> Self {
        AuthPage {
            title: "Sign In - FETCH",
            ..Default::default()
        }
    }

    fn signup() -> Self {
        AuthPage {
            title: "Sign Up - FETCH",
            ..Default::default()
        }
    }
}

#[get("/auth/login")]
#[tracing::instrument(skip(app_state))]
pub async fn login_form(app_state: web::Data<AppState>) -> Result<HttpResponse, PageError> {
    Ok(html(
        StatusCode::OK,
        app_state.templates.render("login", &AuthPage::login())?,
    ))
}

#[post("/auth/login")]
#[tracing::instrument(skip(app_state, form), fields(email = %form.email))]
pub async fn login(
    form: web::Form<LoginForm>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, PageError> {
    let email = form.email.trim();

    match app_state
        .backend
        .sign_in_with_password(email, &form.password)
        .await
    {
        Ok(session) => {
            tracing::info!(user_id = %session.user.id, "User signed in");
            Ok(redirect(FEED_ROUTE)
                .cookie(session_cookie(&session, app_state.secure_cookies))
                .finish())
        }
        Err(error) => {
            tracing::warn!(%error, "Sign in failed");
            let page = AuthPage {
                email,
                error: Some(error.user_message()),
                ..AuthPage::login()
            };
            Ok(html(
                StatusCode::UNAUTHORIZED,
                app_state.templates.render("login", &page)?,
            ))
        }
    }
}

#[get("/auth/signup")]
#[tracing::instrument(skip(app_state))]
pub async fn signup_form(app_state: web::Data<AppState>) -> Result<HttpResponse, PageError> {
    Ok(html(
        StatusCode::OK,
        app_state.templates.render("signup", &AuthPage::signup())?,
    ))
}

#[post("/auth/signup")]
#[tracing::instrument(skip(app_state, form), fields(email = %form.email))]
pub async fn signup(
    form: web::Form<SignupForm>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, PageError> {
    let email = form.email.trim();
    let name = form.name.trim();
    let display_name = Some(name).filter(|name| !name.is_empty());

    match app_state
        .backend
        .sign_up(email, &form.password, display_name)
        .await
    {
        Ok(SignUpOutcome::SignedIn(session)) => {
            tracing::info!(user_id = %session.user.id, "Account created");
            Ok(redirect(FEED_ROUTE)
                .cookie(session_cookie(&session, app_state.secure_cookies))
                .finish())
        }
        Ok(SignUpOutcome::ConfirmationPending(user)) => {
            tracing::info!(user_id = %user.id, "Account created, waiting for email confirmation");
            let page = AuthPage {
                notice: Some(CONFIRMATION_NOTICE),
                ..AuthPage::signup()
            };
            Ok(html(
                StatusCode::OK,
                app_state.templates.render("signup", &page)?,
            ))
        }
        Err(error) => {
            tracing::warn!(%error, "Sign up failed");
            let page = AuthPage {
                email,
                name,
                error: Some(error.user_message()),
                ..AuthPage::signup()
            };
            Ok(html(
                StatusCode::BAD_REQUEST,
                app_state.templates.render("signup", &page)?,
            ))
        }
    }
}

/// # Sign out, best effort
///
/// The backend call may fail, the session cookie is dropped and the visitor sent home anyway.
#[post("/auth/logout")]
#[tracing::instrument(skip_all)]
pub async fn logout(req: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req
        .cookie(SESSION_COOKIE)
        .filter(|cookie| !cookie.value().is_empty())
    {
        let access_token = Secret::new(cookie.value().to_owned());
        if let Err(error) = app_state.backend.sign_out(&access_token).await {
            tracing::warn!(%error, "Sign out failed on the backend, ignoring");
        }
    }

    redirect(HOME_ROUTE).cookie(removal_cookie()).finish()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_form)
        .service(login)
        .service(signup_form)
        .service(signup)
        .service(logout);
}
