//! IdP Metadata endpoint.
//!
//! Generates SAML 2.0 metadata for the local identity provider so
//! service providers can configure trust against it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::error::SamlError;
use crate::metadata::MetadataResolver;
use crate::types::{NameIdFormat, SamlBinding};
use crate::xml::xml_escape;

use super::state::SamlState;

/// GET handler for the IdP metadata endpoint.
pub async fn idp_metadata<R: MetadataResolver>(
    State(state): State<SamlState<R>>,
) -> impl IntoResponse {
    match generate_metadata(&state).await {
        Ok(metadata) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/samlmetadata+xml")],
            metadata,
        )
            .into_response(),
        Err(e) => (
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            e.to_string(),
        )
            .into_response(),
    }
}

/// Generates IdP metadata XML.
async fn generate_metadata<R: MetadataResolver>(
    state: &SamlState<R>,
) -> Result<String, SamlError> {
    let idp = state
        .processor
        .resolver()
        .local_identity_provider(&state.base_url)
        .await?;

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<md:EntityDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" entityID="{}">
    <md:IDPSSODescriptor WantAuthnRequestsSigned="false" protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">
        <md:NameIDFormat>{}</md:NameIDFormat>
        <md:SingleSignOnService Binding="{}" Location="{}"/>
    </md:IDPSSODescriptor>
</md:EntityDescriptor>"#,
        xml_escape(&idp.entity_id),
        NameIdFormat::Persistent.uri(),
        SamlBinding::HttpPost.uri(),
        xml_escape(&idp.single_sign_on_url),
    ))
}
