//! SAML endpoint state management.

use std::sync::Arc;

use crate::endpoints::InitiationProcessor;
use crate::metadata::MetadataResolver;

/// SAML endpoint state.
///
/// Contains the services and configuration needed by SAML endpoints.
pub struct SamlState<R>
where
    R: MetadataResolver,
{
    /// Processor for identity-provider-initiated sign-on.
    pub processor: Arc<InitiationProcessor<R>>,

    /// Externally visible base URL of this identity provider.
    pub base_url: String,
}

impl<R: MetadataResolver> Clone for SamlState<R> {
    fn clone(&self) -> Self {
        Self {
            processor: Arc::clone(&self.processor),
            base_url: self.base_url.clone(),
        }
    }
}

impl<R: MetadataResolver> SamlState<R> {
    /// Creates a new SAML state.
    pub fn new(processor: Arc<InitiationProcessor<R>>, base_url: impl Into<String>) -> Self {
        Self {
            processor,
            base_url: base_url.into(),
        }
    }
}

/// The authenticated user on whose behalf assertions are issued.
///
/// Authentication happens upstream; handlers receive the outcome through
/// request extensions. An absent principal means the request reached the
/// initiation endpoint without a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    /// The subject name carried into issued assertions.
    pub name: String,
}

impl AuthenticatedPrincipal {
    /// Creates a principal with the given subject name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
