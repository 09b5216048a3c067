//! Request authentication.
//!
//! The server trusts an upstream gateway to authenticate users and pass
//! the result in a request header. This middleware lifts that header
//! into the principal extension the SAML handlers read.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use idp_protocol_saml::endpoints::AuthenticatedPrincipal;

/// Configuration for principal extraction.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Header the upstream gateway places the username in.
    pub remote_user_header: String,
}

/// Middleware that resolves the authenticated principal.
///
/// Inserts `Option<AuthenticatedPrincipal>` into request extensions;
/// `None` when the header is absent or empty. Handlers decide whether
/// an unauthenticated request is acceptable.
pub async fn extract_principal(
    State(config): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = request
        .headers()
        .get(&config.remote_user_header)
        .and_then(|v| v.to_str().ok())
        .filter(|name| !name.is_empty())
        .map(AuthenticatedPrincipal::new);
    request.extensions_mut().insert(principal);
    next.run(request).await
}
