use serde::Serialize;

use crate::backend::SupabaseClient;

/// # Reachability of the hosted backend, as shown on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Connected,
    Error,
}

impl BackendStatus {
    pub fn message(&self) -> &'static str {
        match self {
            BackendStatus::Connected => "Connected to Supabase!",
            BackendStatus::Error => "Could not connect to Supabase",
        }
    }
}

/// Count the articles, without reading any, to check the backend URL and key.
#[tracing::instrument(skip_all)]
pub async fn probe_backend(backend: &SupabaseClient) -> BackendStatus {
    match backend.count_articles().await {
        Ok(count) => {
            tracing::debug!(?count, "Backend is reachable");
            BackendStatus::Connected
        }
        Err(error) => {
            tracing::error!(%error, "Backend connection error");
            BackendStatus::Error
        }
    }
}
