//! SAML endpoint handlers.
//!
//! Axum HTTP handlers for the identity provider surface:
//!
//! - **Initiation Endpoint** - IdP-initiated Single Sign-On
//! - **Metadata Endpoint** - Serves the IdP metadata descriptor
//!
//! # Example
//!
//! ```rust,ignore
//! use idp_protocol_saml::endpoints::saml_router;
//! use axum::Router;
//!
//! let app = Router::new()
//!     .merge(saml_router("/saml/idp"))
//!     .with_state(saml_state);
//! ```

mod initiation;
mod metadata;
mod router;
mod state;

pub use initiation::*;
pub use metadata::*;
pub use router::*;
pub use state::*;

use axum::http::StatusCode;
use axum::response::Html;

use crate::error::SamlError;

/// Renders an error as an HTML page with the matching HTTP status.
pub(crate) fn error_response(err: &SamlError) -> (StatusCode, Html<String>) {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>SAML Error</title></head>
<body>
<h1>SAML Error</h1>
<p>{}</p>
</body>
</html>"#,
        err
    );
    (status, Html(html))
}
