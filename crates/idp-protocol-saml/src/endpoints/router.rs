//! SAML router configuration.
//!
//! Provides the Axum router for the identity provider endpoints.

use axum::{routing::get, Router};

use crate::metadata::MetadataResolver;

use super::initiation::idp_initiate;
use super::metadata::idp_metadata;
use super::state::SamlState;

/// Creates the SAML protocol router mounted under `prefix`.
///
/// # Endpoints
///
/// | Method | Path                | Handler        | Description              |
/// |--------|---------------------|----------------|--------------------------|
/// | GET    | `{prefix}/init`     | `idp_initiate` | IdP-initiated sign-on    |
/// | GET    | `{prefix}/metadata` | `idp_metadata` | IdP metadata descriptor  |
///
/// # Usage
///
/// ```rust,ignore
/// use idp_protocol_saml::endpoints::{saml_router, SamlState};
///
/// let state = SamlState::new(processor, base_url);
/// let app = Router::new()
///     .merge(saml_router("/saml/idp"))
///     .with_state(state);
/// ```
pub fn saml_router<R: MetadataResolver>(prefix: &str) -> Router<SamlState<R>> {
    Router::new()
        .route(&format!("{prefix}/init"), get(idp_initiate::<R>))
        .route(&format!("{prefix}/metadata"), get(idp_metadata::<R>))
}
