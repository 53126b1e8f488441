use std::collections::HashMap;

use serde_json::{json, Value};
use wiremock::matchers::{bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fetch_web::configuration::Settings;
use fetch_web::startup::AppState;

pub const ANON_KEY: &str = "anon-key";
pub const ACCESS_TOKEN: &str = "user-access-token";
pub const USER_ID: &str = "6b1d2f5e-8a8c-4a57-9a67-1f0a1f8d9c11";

/// Application state talking to mocked backends
pub fn app_state(backend: &MockServer, extra: &[(&str, &str)]) -> AppState {
    let mut env: HashMap<String, String> = HashMap::from([
        ("SUPABASE_URL".to_owned(), backend.uri()),
        ("SUPABASE_ANON_KEY".to_owned(), ANON_KEY.to_owned()),
    ]);
    for (key, value) in extra {
        env.insert(key.to_string(), value.to_string());
    }

    let settings = Settings::from_lookup(|key| env.get(key).cloned()).unwrap();
    AppState::from_settings(&settings).unwrap()
}

/// The backend accepts the test access token for a user with the given email
pub async fn mock_session(backend: &MockServer, email: Option<&str>) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(header("apikey", ANON_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "aud": "authenticated",
            "role": "authenticated",
            "email": email,
        })))
        .expect(1)
        .mount(backend)
        .await;
}

pub async fn mock_profile(backend: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("select", "name"))
        .and(query_param("id", format!("eq.{USER_ID}")))
        .and(bearer_token(ACCESS_TOKEN))
        .respond_with(response)
        .expect(1)
        .mount(backend)
        .await;
}

pub async fn mock_articles(backend: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(query_param("order", "published_at.desc"))
        .and(bearer_token(ACCESS_TOKEN))
        .respond_with(response)
        .expect(1)
        .mount(backend)
        .await;
}

/// Fail the test if any of the data collections is read
pub async fn forbid_data_access(backend: &MockServer) {
    for collection in ["/rest/v1/profiles", "/rest/v1/articles"] {
        Mock::given(method("GET"))
            .and(path(collection))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(backend)
            .await;
    }
}

pub fn profile(name: &str) -> Value {
    json!({
        "id": USER_ID,
        "email": "ada@example.com",
        "name": name,
        "created_at": "2024-01-01T00:00:00+00:00",
        "updated_at": "2024-01-01T00:00:00+00:00"
    })
}

pub fn article(id: u32, published_at: &str) -> Value {
    json!({
        "id": id.to_string(),
        "title": format!("Article number {id}"),
        "summary": format!("Summary of article {id}"),
        "url": format!("https://example.com/articles/{id}"),
        "source": "Example News",
        "published_at": published_at,
        "created_at": published_at
    })
}

/// Position of an article in the rendered page
pub fn position_of_article(html: &str, id: &str) -> Option<usize> {
    html.find(&format!("id=\"article-{id}\""))
}
