//! SAML error types.
//!
//! The initiation flow recovers nothing locally: every failure is surfaced
//! to the HTTP layer, which owns error-page rendering.

use thiserror::Error;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML protocol errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// Invalid inbound request (missing or malformed parameters).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No authenticated principal was supplied by the hosting layer.
    ///
    /// The initiation endpoint must sit behind an authentication wall;
    /// this error is the explicit surface for a violated precondition.
    #[error("no authenticated principal")]
    NotAuthenticated,

    /// The requested service provider is not registered.
    #[error("unknown service provider: {0}")]
    UnknownServiceProvider(String),

    /// The service provider is registered but disabled.
    #[error("service provider is disabled: {0}")]
    DisabledServiceProvider(String),

    /// Local identity provider metadata could not be produced.
    #[error("unknown identity provider: {0}")]
    UnknownIdentityProvider(String),

    /// The service provider declares no assertion consumer endpoint.
    #[error("no assertion consumer endpoint for service provider: {0}")]
    NoAcsEndpoint(String),

    /// XML serialization failed.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Deflate compression or decompression error.
    #[error("deflate error: {0}")]
    Deflate(String),

    /// Metadata resolution failed for a reason other than an unknown party.
    #[error("resolver error: {0}")]
    Resolver(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SamlError {
    /// Returns the SAML status code for this error.
    ///
    /// Maps errors to the top-level status codes defined by SAML 2.0 Core.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => crate::types::status_codes::REQUESTER,
            Self::NotAuthenticated => crate::types::sub_status_codes::AUTHN_FAILED,
            Self::UnknownServiceProvider(_) | Self::UnknownIdentityProvider(_) => {
                crate::types::sub_status_codes::UNKNOWN_PRINCIPAL
            }
            Self::DisabledServiceProvider(_) => crate::types::sub_status_codes::REQUEST_DENIED,
            _ => crate::types::status_codes::RESPONDER,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::Base64Decode(_) | Self::Deflate(_) => 400,
            Self::NotAuthenticated => 401,
            Self::UnknownServiceProvider(_) | Self::UnknownIdentityProvider(_) => 404,
            Self::DisabledServiceProvider(_) => 403,
            _ => 500,
        }
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}

impl From<std::io::Error> for SamlError {
    fn from(err: std::io::Error) -> Self {
        Self::Deflate(err.to_string())
    }
}
