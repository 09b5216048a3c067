//! Identity-provider-initiated Single Sign-On endpoint.
//!
//! Builds an unsolicited response for a requested service provider and
//! delivers it to the browser as an auto-submitting POST form. There is
//! no inbound AuthnRequest, so nothing here is correlated to one.

use axum::{
    extract::{Extension, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::defaults::ProtocolDefaults;
use crate::error::{SamlError, SamlResult};
use crate::metadata::MetadataResolver;
use crate::types::NameIdFormat;
use crate::xml::to_xml;
use crate::bindings::{HttpPostBinding, PostBindingModel};

use super::error_response;
use super::state::{AuthenticatedPrincipal, SamlState};

/// Outcome of request processing for the surrounding pipeline.
///
/// `Stop` means a complete response has been produced and no further
/// handler should touch the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// Processing should continue with the next handler.
    Continue,
    /// The exchange is complete.
    Stop,
}

/// A completed initiation: the delivery model and its rendered form.
#[derive(Debug, Clone)]
pub struct Initiation {
    /// Pipeline outcome. Always [`ProcessingStatus::Stop`] on success.
    pub status: ProcessingStatus,
    /// The POST delivery model the form was rendered from.
    pub model: PostBindingModel,
    /// The auto-submitting HTML form to return to the browser.
    pub html: String,
}

/// Processor for identity-provider-initiated sign-on.
pub struct InitiationProcessor<R>
where
    R: MetadataResolver,
{
    resolver: Arc<R>,
    defaults: ProtocolDefaults,
    idp_prefix: String,
}

impl<R: MetadataResolver> InitiationProcessor<R> {
    /// Creates a processor mounted under `idp_prefix`.
    pub fn new(resolver: Arc<R>, defaults: ProtocolDefaults, idp_prefix: impl Into<String>) -> Self {
        Self {
            resolver,
            defaults,
            idp_prefix: idp_prefix.into(),
        }
    }

    /// The resolver this processor looks parties up through.
    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The path this processor claims.
    #[must_use]
    pub fn init_path(&self) -> String {
        format!("{}/init", self.idp_prefix)
    }

    /// Whether this processor handles the given request.
    ///
    /// Claims exactly the initiation path, and only when the service
    /// provider parameter is present. Everything else falls through to
    /// other handlers.
    #[must_use]
    pub fn supports(&self, path: &str, sp_entity_id: Option<&str>) -> bool {
        path == self.init_path() && sp_entity_id.is_some()
    }

    /// Runs the initiation flow for a requested service provider.
    ///
    /// Resolves both parties, issues an assertion for the principal,
    /// wraps it in an unsolicited response, and encodes the result for
    /// POST delivery to the provider's preferred assertion consumer
    /// endpoint. Resolution failures propagate unchanged.
    pub async fn process(
        &self,
        base_url: &str,
        sp_entity_id: &str,
        principal: &AuthenticatedPrincipal,
    ) -> SamlResult<Initiation> {
        debug!(sp = %sp_entity_id, "resolving service provider for initiation");
        let recipient = self.resolver.resolve_service_provider(sp_entity_id).await?;
        if !recipient.enabled {
            return Err(SamlError::DisabledServiceProvider(recipient.entity_id));
        }

        let issuer = self.resolver.local_identity_provider(base_url).await?;

        let assertion = self.defaults.assertion(
            &recipient,
            &issuer,
            None,
            &principal.name,
            NameIdFormat::Persistent,
        );
        let response = self.defaults.response(None, assertion, &recipient, &issuer);

        let xml = to_xml(&response)?;
        let acs = recipient.preferred_acs()?;
        let model = HttpPostBinding::encode_response(&xml, &acs.location)?;
        let html = HttpPostBinding::render_form(&model);

        info!(
            sp = %recipient.entity_id,
            acs = %acs.location,
            response_id = %response.id,
            "issued unsolicited response"
        );

        Ok(Initiation {
            status: ProcessingStatus::Stop,
            model,
            html,
        })
    }
}

/// Query parameters for the initiation endpoint.
#[derive(Debug, Deserialize)]
pub struct InitParams {
    /// Entity ID of the service provider to sign on to.
    pub sp: Option<String>,
}

/// GET handler for the initiation endpoint.
pub async fn idp_initiate<R: MetadataResolver>(
    State(state): State<SamlState<R>>,
    Extension(principal): Extension<Option<AuthenticatedPrincipal>>,
    uri: Uri,
    Query(params): Query<InitParams>,
) -> impl IntoResponse {
    if !state.processor.supports(uri.path(), params.sp.as_deref()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    // supports() guarantees the parameter is present.
    let Some(sp) = params.sp else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(principal) = principal else {
        return error_response(&SamlError::NotAuthenticated).into_response();
    };

    match state.processor.process(&state.base_url, &sp, &principal).await {
        Ok(initiation) => Html(initiation.html).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
