//! Configuration constants and utilities for marquee
//!
//! Connection profiles live in an INI file; each section names a profile and
//! carries the catalog endpoint and API key. The file location can be
//! overridden through the environment.

use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;

/// Default profile file path for marquee
pub const DEFAULT_PROFILE_PATH: &str = "~/.marquee/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "MARQUEE_PROFILE_PATH";

/// Catalog endpoint used when a profile does not name one
pub const DEFAULT_ENDPOINT: &str = "http://www.omdbapi.com/";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Connection settings for the movie catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    endpoint: String,
    api_key: String,
}

impl Profile {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// A profile that talks to the default endpoint with no API key. Lookups
/// will fail against the real catalog, but the application still starts.
pub fn get_blank_profile() -> Profile {
    Profile {
        endpoint: DEFAULT_ENDPOINT.to_string(),
        api_key: String::new(),
    }
}

/// Loads named profiles from an INI file.
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Load a profile by section name. Returns `Ok(None)` when the file or
    /// the section does not exist.
    pub fn get_profile(&self, name: &str) -> Result<Option<Profile>> {
        let expanded = shellexpand::tilde(&self.path);
        let path = Path::new(expanded.as_ref());
        if !path.exists() {
            tracing::debug!(path = %expanded, "profile file does not exist");
            return Ok(None);
        }

        let file = Ini::load_from_file(path)
            .with_context(|| format!("failed to read profile file '{expanded}'"))?;

        let Some(section) = file.section(Some(name)) else {
            return Ok(None);
        };

        Ok(Some(Profile {
            endpoint: section
                .get("endpoint")
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            api_key: section.get("api_key").unwrap_or_default().to_string(),
        }))
    }
}
