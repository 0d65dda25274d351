//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::{Config, ConfigError, ContentBackend};
use crate::contact::{ContactRelay, EmailSender, ResendClient};
use crate::fixture::FixtureSource;
use crate::query::{ContentSource, ContentfulSource};
use crate::resolve::PageResolver;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Route resolution over the content backend, with revalidating caches.
    pub resolver: PageResolver,

    /// Contact relay, or the reason it is unavailable.
    pub contact: Result<Arc<ContactRelay>, ConfigError>,
}

impl AppState {
    /// Create application state from configuration, wiring the configured
    /// content backend and the Resend email client.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let source: Arc<dyn ContentSource> = match &config.content {
            ContentBackend::Contentful(settings) => {
                Arc::new(ContentfulSource::new(settings.clone())?)
            }
            ContentBackend::Fixture(path) => Arc::new(FixtureSource::from_path(path)?),
        };

        let sender: Option<Arc<dyn EmailSender>> = match &config.contact {
            Ok(contact) => Some(Arc::new(ResendClient::new(
                contact.api_key.clone(),
                contact.api_base.clone(),
            )?)),
            Err(_) => None,
        };

        Ok(Self::with_parts(config, source, sender))
    }

    /// Assemble state from explicit parts. Tests use this to swap in
    /// in-process backends.
    pub fn with_parts(
        config: Config,
        source: Arc<dyn ContentSource>,
        sender: Option<Arc<dyn EmailSender>>,
    ) -> Self {
        let resolver = PageResolver::new(source, config.revalidate);

        let contact = match (&config.contact, sender) {
            (Ok(contact), Some(sender)) => Ok(Arc::new(ContactRelay::new(contact.clone(), sender))),
            (Ok(_), None) => Err(ConfigError::Missing("email sender")),
            (Err(e), _) => Err(e.clone()),
        };

        match &contact {
            Ok(_) => tracing::info!("contact relay enabled"),
            Err(e) => tracing::warn!(error = %e, "contact relay disabled, submissions will fail"),
        }

        tracing::info!(
            revalidate_secs = config.revalidate.as_secs(),
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            resolver,
            contact,
        }
    }

    /// The contact relay, or why there is none.
    pub fn contact_relay(&self) -> Result<&ContactRelay, &ConfigError> {
        self.contact.as_ref().map(|relay| &**relay)
    }
}
