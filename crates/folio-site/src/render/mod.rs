//! HTML rendering.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic escaping of every dynamic value. Pages carry
//! no JavaScript; interactive parts (list filters, the contact form) are
//! plain HTML forms.

pub mod components;
pub mod entry;
pub mod home;
pub mod rich_text;

#[cfg(test)]
pub(crate) fn test_config() -> crate::config::Config {
    use crate::config::{Config, ConfigError, ContentBackend};

    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        base_url: "https://folio.test".to_string(),
        site_name: "Folio".to_string(),
        owner_name: "Test Owner".to_string(),
        tagline: "Builds things.".to_string(),
        revalidate: std::time::Duration::from_secs(60),
        content: ContentBackend::Fixture("fixtures/content.json".into()),
        contact: Err(ConfigError::Missing("RESEND_API_KEY")),
    }
}
