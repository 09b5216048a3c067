//! SAML 2.0 IdP-initiated Single Sign-On for the HTTP-POST binding.
//!
//! This crate implements the unsolicited SSO flow: an identity provider
//! manufactures a signed-in user's assertion for a named service provider
//! and delivers it to the browser as an auto-submitting HTML form that
//! posts to the service's assertion consumer endpoint.
//!
//! The crate is organized into several modules:
//!
//! - [`types`] - Core SAML types (assertions, responses, name identifiers)
//! - [`metadata`] - Party descriptors and the [`metadata::MetadataResolver`] seam
//! - [`defaults`] - Protocol defaults for assertion/response construction
//! - [`xml`] - Wire serialization of protocol responses
//! - [`bindings`] - HTTP-POST binding encoding and form rendering
//! - [`endpoints`] - Axum HTTP handlers and the initiation processor
//! - [`error`] - Error types for SAML operations
//!
//! # Example
//!
//! ```rust,ignore
//! use idp_protocol_saml::endpoints::{saml_router, SamlState};
//! use axum::Router;
//!
//! let state = SamlState::new(processor, base_url);
//! let app = Router::new()
//!     .merge(saml_router("/saml/idp"))
//!     .with_state(state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod defaults;
pub mod endpoints;
pub mod error;
pub mod metadata;
pub mod types;
pub mod xml;

pub use error::{SamlError, SamlResult};
pub use types::*;
