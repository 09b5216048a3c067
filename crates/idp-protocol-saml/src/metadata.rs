//! Party metadata and the resolver seam.
//!
//! Descriptors for the two protocol participants and the trait through
//! which the initiation processor looks them up. Remote metadata
//! discovery and caching live behind the trait, outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};
use crate::types::SamlBinding;

/// An assertion consumer service endpoint declared by a service provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcsEndpoint {
    /// The endpoint URL.
    pub location: String,

    /// The binding this endpoint accepts.
    #[serde(default)]
    pub binding: SamlBinding,

    /// The index of this endpoint in the provider's declaration.
    #[serde(default)]
    pub index: u16,

    /// Whether the provider marked this endpoint as its default.
    #[serde(default)]
    pub is_default: bool,
}

impl AcsEndpoint {
    /// Creates a POST-binding endpoint at the given location.
    #[must_use]
    pub fn post(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            binding: SamlBinding::HttpPost,
            index: 0,
            is_default: false,
        }
    }

    /// Marks this endpoint as the provider's default.
    #[must_use]
    pub const fn default_endpoint(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Descriptor of a relying service provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProviderMetadata {
    /// The canonical URI naming this provider.
    pub entity_id: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered list of assertion consumer endpoints.
    pub assertion_consumer_services: Vec<AcsEndpoint>,

    /// Whether this provider may receive assertions.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl ServiceProviderMetadata {
    /// Creates a descriptor with the given entity ID and endpoints.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, endpoints: Vec<AcsEndpoint>) -> Self {
        Self {
            entity_id: entity_id.into(),
            name: None,
            assertion_consumer_services: endpoints,
            enabled: true,
        }
    }

    /// Selects the assertion consumer endpoint to post to.
    ///
    /// Picks the first endpoint flagged as default, falling back to the
    /// first endpoint in declaration order. A provider declaring no
    /// endpoint at all is an error.
    pub fn preferred_acs(&self) -> SamlResult<&AcsEndpoint> {
        self.assertion_consumer_services
            .iter()
            .find(|e| e.is_default)
            .or_else(|| self.assertion_consumer_services.first())
            .ok_or_else(|| SamlError::NoAcsEndpoint(self.entity_id.clone()))
    }
}

/// Descriptor of the local identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProviderMetadata {
    /// The canonical URI naming this provider.
    pub entity_id: String,

    /// The URL of the single sign-on service.
    pub single_sign_on_url: String,
}

/// Looks up party metadata for the initiation processor.
///
/// Implementations own discovery, storage, and caching. A failed service
/// provider lookup surfaces as [`SamlError::UnknownServiceProvider`] and
/// propagates unchanged through the processor.
#[async_trait]
pub trait MetadataResolver: Send + Sync + 'static {
    /// Resolves a service provider's metadata by entity ID.
    async fn resolve_service_provider(&self, entity_id: &str)
        -> SamlResult<ServiceProviderMetadata>;

    /// Returns the local identity provider's metadata for the given
    /// externally visible base URL.
    async fn local_identity_provider(&self, base_url: &str)
        -> SamlResult<IdentityProviderMetadata>;
}
