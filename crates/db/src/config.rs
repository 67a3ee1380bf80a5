//! Service credentials resolved from the environment.

use std::fmt;

use crate::error::DbAuthError;

/// Primary variable holding the service URL.
pub const URL_ENV: &str = "VITE_SUPABASE_URL";
/// Consulted when [`URL_ENV`] is unset or empty.
pub const URL_FALLBACK_ENV: &str = "SUPABASE_URL";
/// Primary variable holding the anonymous service key.
pub const KEY_ENV: &str = "VITE_SUPABASE_ANON_KEY";
/// Consulted when [`KEY_ENV`] is unset or empty.
pub const KEY_FALLBACK_ENV: &str = "SUPABASE_ANON_KEY";

/// Return the first non-empty value among `primary` and `fallback`.
pub fn resolve<F>(lookup: &F, primary: &str, fallback: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [primary, fallback]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
}

/// Validated URL and key for the remote service.
///
/// Both fields are guaranteed non-empty. Once built the config is never
/// mutated; share it by reference.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    url: String,
    key: String,
}

impl ServiceConfig {
    /// Build a config from explicit values.
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Result<Self, DbAuthError> {
        let url = url.into();
        let key = key.into();
        if url.is_empty() || key.is_empty() {
            return Err(DbAuthError::MissingCredentials);
        }
        Ok(Self { url, key })
    }

    /// Resolve the config from the process environment.
    pub fn from_env() -> Result<Self, DbAuthError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the config through an arbitrary variable lookup.
    ///
    /// Each value is taken from its primary variable, then its fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbAuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = resolve(&lookup, URL_ENV, URL_FALLBACK_ENV);
        let key = resolve(&lookup, KEY_ENV, KEY_FALLBACK_ENV);
        match (url, key) {
            (Some(url), Some(key)) => Self::new(url, key),
            _ => Err(DbAuthError::MissingCredentials),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key with everything but its last four characters hidden.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("url", &self.url)
            .field("key", &self.masked_key())
            .finish()
    }
}
