//! Metadata resolver backed by a static registry file.
//!
//! Service providers are declared in a JSON file loaded at startup. The
//! local identity provider's descriptor is derived from the configured
//! base URL and mount prefix.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use idp_protocol_saml::metadata::{
    IdentityProviderMetadata, MetadataResolver, ServiceProviderMetadata,
};
use idp_protocol_saml::{SamlError, SamlResult};

/// Resolver over a fixed set of registered service providers.
pub struct StaticResolver {
    providers: HashMap<String, ServiceProviderMetadata>,
    idp_prefix: String,
}

impl StaticResolver {
    /// Creates a resolver from an already loaded registry.
    #[must_use]
    pub fn new(providers: Vec<ServiceProviderMetadata>, idp_prefix: impl Into<String>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|p| (p.entity_id.clone(), p))
                .collect(),
            idp_prefix: idp_prefix.into(),
        }
    }

    /// Loads the registry from a JSON file.
    pub fn from_file(path: impl AsRef<Path>, idp_prefix: impl Into<String>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let providers: Vec<ServiceProviderMetadata> = serde_json::from_str(&raw)?;
        tracing::info!(
            count = providers.len(),
            path = %path.as_ref().display(),
            "loaded service provider registry"
        );
        Ok(Self::new(providers, idp_prefix))
    }
}

#[async_trait]
impl MetadataResolver for StaticResolver {
    async fn resolve_service_provider(
        &self,
        entity_id: &str,
    ) -> SamlResult<ServiceProviderMetadata> {
        self.providers
            .get(entity_id)
            .cloned()
            .ok_or_else(|| SamlError::UnknownServiceProvider(entity_id.to_string()))
    }

    async fn local_identity_provider(
        &self,
        base_url: &str,
    ) -> SamlResult<IdentityProviderMetadata> {
        let base = base_url.trim_end_matches('/');
        Ok(IdentityProviderMetadata {
            entity_id: format!("{}{}/metadata", base, self.idp_prefix),
            single_sign_on_url: format!("{}{}/init", base, self.idp_prefix),
        })
    }
}
