//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DEFAULT_REVALIDATE;
use crate::query::ContentfulSettings;

const DEFAULT_TAGLINE: &str = "Project Manager and Product Developer with a passion for creating innovative solutions in multimedia and intelligent systems.";

/// A required setting that is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Where content comes from.
#[derive(Debug, Clone)]
pub enum ContentBackend {
    /// Live Contentful delivery API.
    Contentful(ContentfulSettings),
    /// Local JSON file in delivery API shape, for development and tests.
    Fixture(PathBuf),
}

/// Settings for relaying contact submissions by email.
#[derive(Clone, PartialEq, Eq)]
pub struct ContactConfig {
    pub api_key: String,
    pub to_email: String,
    pub from: String,
    pub api_base: String,
}

impl std::fmt::Debug for ContactConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactConfig")
            .field("api_key", &"<redacted>")
            .field("to_email", &self.to_email)
            .field("from", &self.from)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ContactConfig {
    /// Load contact settings.
    ///
    /// Required: `RESEND_API_KEY`, `CONTACT_FORM_TO_EMAIL`.
    /// Optional: `CONTACT_FORM_FROM`, `RESEND_API_BASE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required("RESEND_API_KEY")?,
            to_email: required("CONTACT_FORM_TO_EMAIL")?,
            from: optional("CONTACT_FORM_FROM")
                .unwrap_or_else(|| "Portfolio Contact <onboarding@resend.dev>".to_string()),
            api_base: optional("RESEND_API_BASE")
                .unwrap_or_else(|| "https://api.resend.com".to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000").
    pub bind_addr: String,

    /// Public base URL, used for canonical and OG URLs.
    pub base_url: String,

    /// Site name shown in page titles and OG tags.
    pub site_name: String,

    pub owner_name: String,
    pub tagline: String,

    /// How long resolved content is served before it is revalidated.
    pub revalidate: Duration,

    pub content: ContentBackend,

    /// Contact relay settings. An error here disables only the contact
    /// endpoints; the rest of the site still serves.
    pub contact: Result<ContactConfig, ConfigError>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `CONTENTFUL_SPACE_ID`, `CONTENTFUL_ACCESS_TOKEN` unless
    ///   `FOLIO_CONTENT_FIXTURE` is set
    ///
    /// Optional:
    /// - `FOLIO_BIND_ADDR`: Server bind address (default: "0.0.0.0:3000")
    /// - `FOLIO_BASE_URL`: Base URL for links/OG tags (default: "http://localhost:3000")
    /// - `FOLIO_SITE_NAME`: Site name (default: "Portfolio")
    /// - `FOLIO_OWNER_NAME`, `FOLIO_TAGLINE`: Home page intro
    /// - `FOLIO_REVALIDATE_SECS`: Revalidation window (default: 60)
    /// - `FOLIO_CONTENT_FIXTURE`: Serve content from a local JSON file
    /// - `CONTENTFUL_ENVIRONMENT` (default: "master"), `CONTENTFUL_API_BASE`,
    ///   `CONTENTFUL_LOCALE`
    /// - Contact settings, see [`ContactConfig::from_env`]
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("FOLIO_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let base_url = std::env::var("FOLIO_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name =
            std::env::var("FOLIO_SITE_NAME").unwrap_or_else(|_| "Portfolio".to_string());

        let owner_name =
            std::env::var("FOLIO_OWNER_NAME").unwrap_or_else(|_| "Iman Key Nama".to_string());

        let tagline = std::env::var("FOLIO_TAGLINE").unwrap_or_else(|_| DEFAULT_TAGLINE.to_string());

        let revalidate = match optional("FOLIO_REVALIDATE_SECS") {
            Some(secs) => {
                let secs: u64 = secs.parse().map_err(|e| {
                    anyhow::anyhow!("FOLIO_REVALIDATE_SECS must be a whole number of seconds: {e}")
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_REVALIDATE,
        };

        let content = match optional("FOLIO_CONTENT_FIXTURE") {
            Some(path) => ContentBackend::Fixture(PathBuf::from(path)),
            None => ContentBackend::Contentful(ContentfulSettings {
                space_id: required("CONTENTFUL_SPACE_ID")?,
                access_token: required("CONTENTFUL_ACCESS_TOKEN")?,
                environment: optional("CONTENTFUL_ENVIRONMENT")
                    .unwrap_or_else(|| "master".to_string()),
                api_base: optional("CONTENTFUL_API_BASE")
                    .unwrap_or_else(|| "https://cdn.contentful.com".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                locale: optional("CONTENTFUL_LOCALE"),
            }),
        };

        let contact = ContactConfig::from_env();

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            site_name = %site_name,
            revalidate_secs = revalidate.as_secs(),
            fixture = matches!(content, ContentBackend::Fixture(_)),
            contact_enabled = contact.is_ok(),
            "site configuration loaded"
        );

        Ok(Self {
            bind_addr,
            base_url,
            site_name,
            owner_name,
            tagline,
            revalidate,
            content,
            contact,
        })
    }
}

/// A non-blank env var, trimmed.
fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "FOLIO_BIND_ADDR",
        "FOLIO_BASE_URL",
        "FOLIO_SITE_NAME",
        "FOLIO_OWNER_NAME",
        "FOLIO_TAGLINE",
        "FOLIO_REVALIDATE_SECS",
        "FOLIO_CONTENT_FIXTURE",
        "CONTENTFUL_SPACE_ID",
        "CONTENTFUL_ACCESS_TOKEN",
        "CONTENTFUL_ENVIRONMENT",
        "CONTENTFUL_API_BASE",
        "CONTENTFUL_LOCALE",
        "RESEND_API_KEY",
        "CONTACT_FORM_TO_EMAIL",
        "CONTACT_FORM_FROM",
        "RESEND_API_BASE",
    ];

    /// Helper to run config tests with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    const CONTENTFUL: &[(&str, &str)] = &[
        ("CONTENTFUL_SPACE_ID", "space1"),
        ("CONTENTFUL_ACCESS_TOKEN", "token1"),
    ];

    #[test]
    fn config_defaults() {
        with_env_vars(CONTENTFUL, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:3000");
            assert_eq!(config.base_url, "http://localhost:3000");
            assert_eq!(config.site_name, "Portfolio");
            assert_eq!(config.owner_name, "Iman Key Nama");
            assert_eq!(config.tagline, DEFAULT_TAGLINE);
            assert_eq!(config.revalidate, Duration::from_secs(60));
            match config.content {
                ContentBackend::Contentful(settings) => {
                    assert_eq!(settings.space_id, "space1");
                    assert_eq!(settings.environment, "master");
                    assert_eq!(settings.api_base, "https://cdn.contentful.com");
                    assert!(settings.locale.is_none());
                }
                other => panic!("unexpected backend: {other:?}"),
            }
            assert_eq!(config.contact, Err(ConfigError::Missing("RESEND_API_KEY")));
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("FOLIO_BIND_ADDR", "127.0.0.1:9090"),
                ("FOLIO_BASE_URL", "https://example.com/"),
                ("FOLIO_SITE_NAME", "Folio"),
                ("FOLIO_REVALIDATE_SECS", "5"),
                ("CONTENTFUL_SPACE_ID", "s"),
                ("CONTENTFUL_ACCESS_TOKEN", "t"),
                ("CONTENTFUL_ENVIRONMENT", "staging"),
                ("CONTENTFUL_LOCALE", "en-US"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.base_url, "https://example.com");
                assert_eq!(config.site_name, "Folio");
                assert_eq!(config.revalidate, Duration::from_secs(5));
                let ContentBackend::Contentful(settings) = config.content else {
                    panic!("expected contentful backend");
                };
                assert_eq!(settings.environment, "staging");
                assert_eq!(settings.locale.as_deref(), Some("en-US"));
            },
        );
    }

    #[test]
    fn config_requires_contentful_credentials() {
        with_env_vars(&[("CONTENTFUL_SPACE_ID", "s")], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("CONTENTFUL_ACCESS_TOKEN"));
        });
    }

    #[test]
    fn config_fixture_needs_no_credentials() {
        with_env_vars(&[("FOLIO_CONTENT_FIXTURE", "fixtures/content.json")], || {
            let config = Config::from_env().unwrap();
            assert!(matches!(config.content, ContentBackend::Fixture(_)));
        });
    }

    #[test]
    fn config_rejects_bad_revalidate() {
        with_env_vars(
            &[("FOLIO_CONTENT_FIXTURE", "x.json"), ("FOLIO_REVALIDATE_SECS", "soon")],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn contact_config_loaded_with_defaults() {
        with_env_vars(
            &[
                ("RESEND_API_KEY", "re_123"),
                ("CONTACT_FORM_TO_EMAIL", "me@example.com"),
            ],
            || {
                let contact = ContactConfig::from_env().unwrap();
                assert_eq!(contact.to_email, "me@example.com");
                assert_eq!(contact.from, "Portfolio Contact <onboarding@resend.dev>");
                assert_eq!(contact.api_base, "https://api.resend.com");
            },
        );
    }

    #[test]
    fn contact_config_blank_counts_as_missing() {
        with_env_vars(
            &[("RESEND_API_KEY", "re_123"), ("CONTACT_FORM_TO_EMAIL", "  ")],
            || {
                assert_eq!(
                    ContactConfig::from_env(),
                    Err(ConfigError::Missing("CONTACT_FORM_TO_EMAIL"))
                );
            },
        );
    }

    #[test]
    fn contact_debug_redacts_key() {
        let contact = ContactConfig {
            api_key: "re_secret".to_string(),
            to_email: "me@example.com".to_string(),
            from: "a@b.c".to_string(),
            api_base: "https://api.resend.com".to_string(),
        };
        assert!(!format!("{contact:?}").contains("re_secret"));
    }
}
