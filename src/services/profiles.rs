use crate::auth::AuthenticatedUser;
use crate::backend::SupabaseClient;

/// Name shown when neither a profile nor an email is available
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// # Resolve the name to greet the user with
///
/// Never fails: when the profile cannot be read, the name is derived from the email.
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn resolve_display_name(backend: &SupabaseClient, user: &AuthenticatedUser) -> String {
    match backend.fetch_profile(&user.access_token, &user.id).await {
        Ok(Some(profile)) => match usable_name(profile.name) {
            Some(name) => name,
            None => {
                tracing::info!("Profile has no name, deriving one from the email");
                fallback_display_name(user.email.as_deref())
            }
        },
        Ok(None) => {
            tracing::warn!("No profile found, deriving the name from the email");
            fallback_display_name(user.email.as_deref())
        }
        Err(error) => {
            tracing::warn!(%error, "Could not fetch the profile, deriving the name from the email");
            fallback_display_name(user.email.as_deref())
        }
    }
}

/// A blank profile name counts as no name at all
fn usable_name(name: Option<String>) -> Option<String> {
    name.filter(|name| !name.trim().is_empty())
}

/// Local part of the email, or [`DEFAULT_DISPLAY_NAME`]
pub fn fallback_display_name(email: Option<&str>) -> String {
    email
        .map(|email| email.split('@').next().unwrap_or(email))
        .filter(|local_part| !local_part.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_owned()
}
