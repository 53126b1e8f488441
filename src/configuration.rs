use std::time::Duration;

use secrecy::Secret;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("{0} environment variable is mandatory")]
    Missing(&'static str),
    #[error("{variable} is not a valid URL: {source}")]
    InvalidUrl {
        variable: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{variable} should be a number, got {value:?}")]
    InvalidNumber { variable: &'static str, value: String },
    #[error("Unknown FEED_SOURCE {0:?}, expected `hosted` or `legacy`")]
    UnknownFeedSource(String),
}

/// # Hosted backend coordinates
#[derive(Debug)]
pub struct SupabaseSettings {
    pub url: Url,
    pub anon_key: Secret<String>,
}

/// # Where the feed articles come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSourceSettings {
    /// The `articles` collection of the hosted backend
    Hosted,
    /// The superseded custom backend and its `/articles` endpoint
    Legacy { api_url: Url },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitingSettings {
    pub per_second: u64,
    pub burst_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Read apart from [`Settings`] as logging starts before them.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(format) if format.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// # Application configuration
#[derive(Debug)]
pub struct Settings {
    pub listen_on: String,
    pub supabase: SupabaseSettings,
    pub feed_source: FeedSourceSettings,
    pub backend_timeout: Option<Duration>,
    pub rate_limiting: RateLimitingSettings,
    pub secure_cookies: bool,
}

const DEFAULT_LISTEN_ON: &str = "0.0.0.0:8080";
const DEFAULT_LEGACY_API_URL: &str = "http://localhost:8000";

impl Settings {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| get(*key));

        let supabase_url = first_of(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"])
            .ok_or(ConfigurationError::Missing("SUPABASE_URL"))?;
        let anon_key = first_of(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"])
            .ok_or(ConfigurationError::Missing("SUPABASE_ANON_KEY"))?;

        let supabase = SupabaseSettings {
            url: parse_url("SUPABASE_URL", &supabase_url)?,
            anon_key: Secret::new(anon_key),
        };

        let feed_source = match get("FEED_SOURCE").as_deref().map(str::to_ascii_lowercase) {
            None => FeedSourceSettings::Hosted,
            Some(source) if source == "hosted" => FeedSourceSettings::Hosted,
            Some(source) if source == "legacy" => {
                let api_url = first_of(&["API_URL", "NEXT_PUBLIC_API_URL"])
                    .unwrap_or_else(|| DEFAULT_LEGACY_API_URL.to_owned());
                FeedSourceSettings::Legacy {
                    api_url: parse_url("API_URL", &api_url)?,
                }
            }
            Some(source) => return Err(ConfigurationError::UnknownFeedSource(source)),
        };

        // A zero timeout would fail every backend call
        let backend_timeout = get("BACKEND_TIMEOUT_SECS")
            .map(|value| match parse_number::<u64>("BACKEND_TIMEOUT_SECS", value.clone())? {
                0 => Err(ConfigurationError::InvalidNumber {
                    variable: "BACKEND_TIMEOUT_SECS",
                    value,
                }),
                seconds => Ok(Duration::from_secs(seconds)),
            })
            .transpose()?;

        let rate_limiting = RateLimitingSettings {
            per_second: get("RATE_LIMITING_PER_SECOND")
                .map(|value| parse_number("RATE_LIMITING_PER_SECOND", value))
                .transpose()?
                .unwrap_or(10),
            burst_size: get("RATE_LIMITING_BURST_SIZE")
                .map(|value| parse_number("RATE_LIMITING_BURST_SIZE", value))
                .transpose()?
                .unwrap_or(100),
        };

        let secure_cookies = get("COOKIE_SECURE")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Settings {
            listen_on: get("FETCH_LISTEN_ON").unwrap_or_else(|| DEFAULT_LISTEN_ON.to_owned()),
            supabase,
            feed_source,
            backend_timeout,
            rate_limiting,
            secure_cookies,
        })
    }
}

fn parse_url(variable: &'static str, value: &str) -> Result<Url, ConfigurationError> {
    Url::parse(value).map_err(|source| ConfigurationError::InvalidUrl { variable, source })
}

fn parse_number<T: std::str::FromStr>(
    variable: &'static str,
    value: String,
) -> Result<T, ConfigurationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidNumber { variable, value })
}
