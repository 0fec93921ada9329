use super::config::Config;
use crate::error::ConfigError;
use crate::utils::validation::{validate_timeout_secs, validate_url};
use std::time::Duration;

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_STALE_TIME_SECS: u64 = 300;

/// Process-wide settings, resolved once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub stale_time: Duration,
}

impl Settings {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        validate_url(&base_url).map_err(|reason| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: base_url.clone(),
            reason,
        })?;

        Ok(Self {
            base_url,
            timeout: None,
            stale_time: Duration::from_secs(DEFAULT_STALE_TIME_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Resolve settings for `profile` (or the file's default profile).
    ///
    /// `base_url_override` comes from `--base-url` / `NODEBOT_BASE_URL` and wins
    /// over the profile value. There is no built-in fallback URL.
    pub fn resolve(
        config: &Config,
        profile: Option<&str>,
        base_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let explicit_profile = profile.is_some();
        let profile_name = profile
            .or(config.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE);

        let profile = match config.get_profile(profile_name) {
            Some(profile) => Some(profile),
            None if explicit_profile && base_url_override.is_none() => {
                return Err(ConfigError::ProfileNotFound {
                    name: profile_name.to_string(),
                });
            }
            None => None,
        };

        let base_url = base_url_override
            .map(str::to_string)
            .or_else(|| profile.and_then(|p| p.base_url.clone()))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "base_url".to_string(),
                hint: format!(
                    "pass --base-url, set NODEBOT_BASE_URL, or run 'nodebot settings set url <URL>' for profile '{}'",
                    profile_name
                ),
            })?;

        let mut settings = Self::new(base_url)?;

        if let Some(profile) = profile {
            if let Some(secs) = profile.timeout_seconds {
                validate_timeout_secs(secs).map_err(|reason| ConfigError::InvalidValue {
                    field: "timeout_seconds".to_string(),
                    value: secs.to_string(),
                    reason,
                })?;
                settings = settings.with_timeout(Duration::from_secs(secs));
            }
            if let Some(secs) = profile.stale_time_seconds {
                settings = settings.with_stale_time(Duration::from_secs(secs));
            }
        }

        tracing::debug!(
            profile = profile_name,
            base_url = %settings.base_url,
            "resolved settings"
        );
        Ok(settings)
    }
}
