//! SAML bindings implementation.
//!
//! Message transport for the SAML 2.0 bindings:
//!
//! - **HTTP-POST Binding** - Messages are base64-encoded and delivered
//!   through an auto-submitting HTML form
//! - **HTTP-Redirect Binding** - Messages are deflated and
//!   base64-encoded before being placed in a query string
//!
//! The POST binding is the delivery path for identity-provider-initiated
//! responses; the shared encode/decode helpers serve both.

use std::io::{Read, Write};

use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{SamlError, SamlResult};

mod post;

pub use post::*;

/// SAML message type for binding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamlMessageType {
    /// AuthnRequest message.
    Request,
    /// Response message.
    Response,
}

impl SamlMessageType {
    /// Returns the form parameter name for this message type.
    #[must_use]
    pub const fn form_param(&self) -> &'static str {
        match self {
            Self::Request => "SAMLRequest",
            Self::Response => "SAMLResponse",
        }
    }
}

/// Encodes a SAML message for transport.
///
/// With `deflate` set, the message is raw-deflated before base64 as the
/// redirect binding requires. The POST binding passes `false` and gets a
/// plain base64 encoding. The output carries no line breaks either way.
pub fn saml_encode(xml: &str, deflate: bool) -> SamlResult<String> {
    let bytes = if deflate {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(xml.as_bytes())?;
        encoder.finish()?
    } else {
        xml.as_bytes().to_vec()
    };
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Decodes a SAML message from its transport encoding.
///
/// The `inflate` flag must match the `deflate` flag the message was
/// encoded with.
pub fn saml_decode(encoded: &str, inflate: bool) -> SamlResult<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| SamlError::Base64Decode(e.to_string()))?;

    let bytes = if inflate {
        let mut decoder = DeflateDecoder::new(bytes.as_slice());
        let mut inflated = Vec::new();
        decoder
            .read_to_end(&mut inflated)
            .map_err(|e| SamlError::Deflate(e.to_string()))?;
        inflated
    } else {
        bytes
    };

    String::from_utf8(bytes)
        .map_err(|e| SamlError::InvalidRequest(format!("Invalid UTF-8 in message: {e}")))
}
