use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod timestamp;

/// # Display-facing record of an authenticated identity
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Profile {
    /// Same as the auth user id
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub name: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// # The only profile column the feed needs
///
/// Other columns may be null or absent without making the profile unreadable.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileName {
    #[serde(default)]
    pub name: Option<String>,
}

/// # A curated article, read-only from here
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub url: String,
    pub source: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub published_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// # Interest declared by a user
///
/// Matches the `user_interests` collection. Nothing reads or writes it yet.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserInterest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub interest_name: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// # Article saved by a user
///
/// Matches the `saved_articles` collection. Nothing reads or writes it yet.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SavedArticle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub article_id: Uuid,
    pub is_read: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub saved_at: DateTime<Utc>,
}

/// # User as known by the auth API
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// # Session issued by the auth API on sign in
#[derive(Debug, Deserialize)]
pub struct Session {
    pub access_token: Secret<String>,
    pub token_type: String,
    /// Lifetime of the access token, in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
    pub user: AuthUser,
}

/// # Outcome of a sign up
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    /// The project auto-confirms accounts: the user is logged in right away
    SignedIn(Session),
    /// The user must confirm the account by email first
    ConfirmationPending(AuthUser),
}
