use std::env;

use qualtive_core::{Locale, DEFAULT_BASE_URL};

/// Environment variable overriding the API origin.
pub const BASE_URL_ENV: &str = "QUALTIVE_BASE_URL";

/// Locale variables consulted in order; the first usable one wins.
const LOCALE_ENV: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Identity of the embedding application, reported as entry attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub build: Option<String>,
}

impl AppInfo {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }
}

/// Application-wide user details merged into the default [`qualtive_core::User`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Settings for a [`crate::Qualtive`] instance.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub locale: Locale,
    pub app: AppInfo,
    pub user: UserProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: locale_from_env(),
            app: AppInfo::default(),
            user: UserProfile::default(),
        }
    }
}

impl Config {
    /// Defaults, with the base URL taken from `QUALTIVE_BASE_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = env::var(BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_app(mut self, app: AppInfo) -> Self {
        self.app = app;
        self
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = user;
        self
    }
}

fn locale_from_env() -> Locale {
    LOCALE_ENV
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| usable_locale(value))
        .map(|value| Locale::new(&value))
        .unwrap_or_default()
}

/// `C` and `POSIX` carry no language information.
fn usable_locale(value: &str) -> bool {
    let value = value.split('.').next().unwrap_or_default();
    !value.is_empty() && value != "C" && value != "POSIX"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_locales_are_skipped() {
        assert!(!usable_locale("C"));
        assert!(!usable_locale("C.UTF-8"));
        assert!(!usable_locale("POSIX"));
        assert!(!usable_locale(""));
        assert!(usable_locale("sv_SE.UTF-8"));
    }

    #[test]
    fn builders_override_defaults() {
        let config = Config::default()
            .with_base_url("http://localhost:3000")
            .with_locale(Locale::new("de_DE"))
            .with_app(AppInfo::new("com.example.app").with_version("1.2").with_build("42"))
            .with_user(UserProfile {
                id: Some("u-1".to_string()),
                ..UserProfile::default()
            });
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.locale.identifier(), "de_DE");
        assert_eq!(config.app.identifier.as_deref(), Some("com.example.app"));
        assert_eq!(config.app.build.as_deref(), Some("42"));
        assert_eq!(config.user.id.as_deref(), Some("u-1"));
    }

    #[test]
    fn default_points_at_production() {
        assert_eq!(Config::default().base_url, DEFAULT_BASE_URL);
    }
}
