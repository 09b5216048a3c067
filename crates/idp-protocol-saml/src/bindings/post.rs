//! HTTP-POST Binding implementation.
//!
//! Implements the SAML 2.0 HTTP-POST binding for delivering SAML
//! messages via an auto-submitting HTML form posted by the browser.

use crate::error::SamlResult;

use super::{saml_encode, SamlMessageType};

/// Form field carrying the destination URL.
pub const ACTION_FIELD: &str = "action";

/// Form field carrying the encoded response.
pub const SAML_RESPONSE_FIELD: &str = "SAMLResponse";

/// Model of a POST-binding delivery: where the form posts and what it
/// carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBindingModel {
    /// The URL the form posts to.
    pub action: String,
    /// The base64-encoded response document.
    pub saml_response: String,
}

impl PostBindingModel {
    /// Returns the model as named form fields.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 2] {
        [
            (ACTION_FIELD, self.action.as_str()),
            (SAML_RESPONSE_FIELD, self.saml_response.as_str()),
        ]
    }
}

/// HTTP-POST binding encoder.
pub struct HttpPostBinding;

impl HttpPostBinding {
    /// Encodes a response document for POST delivery to `destination`.
    ///
    /// The document is base64-encoded without compression; the POST
    /// binding never deflates.
    pub fn encode_response(xml: &str, destination: &str) -> SamlResult<PostBindingModel> {
        Ok(PostBindingModel {
            action: destination.to_string(),
            saml_response: saml_encode(xml, false)?,
        })
    }

    /// Renders the model as an HTML form that auto-submits to the
    /// destination.
    #[must_use]
    pub fn render_form(model: &PostBindingModel) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>SAML POST Binding</title>
</head>
<body onload="document.forms[0].submit()">
    <noscript>
        <p>JavaScript is disabled. Click the button below to continue.</p>
    </noscript>
    <form method="post" action="{}">
        <input type="hidden" name="{}" value="{}"/>
        <noscript>
            <input type="submit" value="Continue"/>
        </noscript>
    </form>
</body>
</html>"#,
            html_escape(&model.action),
            SamlMessageType::Response.form_param(),
            model.saml_response,
        )
    }
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
