//! Wire serialization of protocol responses.
//!
//! Produces the canonical XML form of a [`Response`] for binding-level
//! encoding. Signing and canonicalization are applied by outer layers,
//! not here.

use chrono::{DateTime, Utc};

use crate::error::SamlResult;
use crate::types::{
    Assertion, AuthnStatement, Conditions, NameId, Response, StatusCode, Subject, SAMLP_NS, SAML_NS,
};

/// Serializes a response to its XML document form.
pub fn to_xml(response: &Response) -> SamlResult<String> {
    let mut attrs = format!(
        r#"ID="{}" Version="2.0" IssueInstant="{}""#,
        xml_escape(&response.id),
        instant(&response.issue_instant),
    );
    if let Some(destination) = &response.destination {
        attrs.push_str(&format!(r#" Destination="{}""#, xml_escape(destination)));
    }
    if let Some(in_response_to) = &response.in_response_to {
        attrs.push_str(&format!(r#" InResponseTo="{}""#, xml_escape(in_response_to)));
    }

    let assertions: String = response.assertions.iter().map(assertion_xml).collect();

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><samlp:Response xmlns:samlp="{samlp}" xmlns:saml="{saml}" {attrs}><saml:Issuer>{issuer}</saml:Issuer>{status}{assertions}</samlp:Response>"#,
        samlp = SAMLP_NS,
        saml = SAML_NS,
        attrs = attrs,
        issuer = xml_escape(&response.issuer),
        status = status_xml(&response.status.status_code, response.status.status_message.as_deref()),
        assertions = assertions,
    ))
}

fn status_xml(code: &StatusCode, message: Option<&str>) -> String {
    let code_xml = match &code.status_code {
        Some(sub) => format!(
            r#"<samlp:StatusCode Value="{}"><samlp:StatusCode Value="{}"/></samlp:StatusCode>"#,
            xml_escape(&code.value),
            xml_escape(&sub.value),
        ),
        None => format!(r#"<samlp:StatusCode Value="{}"/>"#, xml_escape(&code.value)),
    };
    let message_xml = message
        .map(|m| format!("<samlp:StatusMessage>{}</samlp:StatusMessage>", xml_escape(m)))
        .unwrap_or_default();
    format!("<samlp:Status>{code_xml}{message_xml}</samlp:Status>")
}

fn assertion_xml(assertion: &Assertion) -> String {
    format!(
        r#"<saml:Assertion ID="{}" Version="2.0" IssueInstant="{}"><saml:Issuer>{}</saml:Issuer>{}{}{}</saml:Assertion>"#,
        xml_escape(&assertion.id),
        instant(&assertion.issue_instant),
        xml_escape(&assertion.issuer),
        assertion.subject.as_ref().map(subject_xml).unwrap_or_default(),
        assertion.conditions.as_ref().map(conditions_xml).unwrap_or_default(),
        assertion
            .authn_statement
            .as_ref()
            .map(authn_statement_xml)
            .unwrap_or_default(),
    )
}

fn subject_xml(subject: &Subject) -> String {
    let name_id = subject.name_id.as_ref().map(name_id_xml).unwrap_or_default();
    let confirmations: String = subject
        .subject_confirmations
        .iter()
        .map(|confirmation| {
            let data = confirmation
                .subject_confirmation_data
                .as_ref()
                .map(|data| {
                    let mut attrs = String::new();
                    if let Some(recipient) = &data.recipient {
                        attrs.push_str(&format!(r#" Recipient="{}""#, xml_escape(recipient)));
                    }
                    if let Some(not_on_or_after) = &data.not_on_or_after {
                        attrs.push_str(&format!(r#" NotOnOrAfter="{}""#, instant(not_on_or_after)));
                    }
                    if let Some(in_response_to) = &data.in_response_to {
                        attrs.push_str(&format!(r#" InResponseTo="{}""#, xml_escape(in_response_to)));
                    }
                    format!("<saml:SubjectConfirmationData{attrs}/>")
                })
                .unwrap_or_default();
            format!(
                r#"<saml:SubjectConfirmation Method="{}">{}</saml:SubjectConfirmation>"#,
                xml_escape(&confirmation.method),
                data,
            )
        })
        .collect();
    format!("<saml:Subject>{name_id}{confirmations}</saml:Subject>")
}

fn name_id_xml(name_id: &NameId) -> String {
    let mut attrs = String::new();
    if let Some(format) = &name_id.format {
        attrs.push_str(&format!(r#" Format="{}""#, xml_escape(format)));
    }
    if let Some(qualifier) = &name_id.name_qualifier {
        attrs.push_str(&format!(r#" NameQualifier="{}""#, xml_escape(qualifier)));
    }
    if let Some(qualifier) = &name_id.sp_name_qualifier {
        attrs.push_str(&format!(r#" SPNameQualifier="{}""#, xml_escape(qualifier)));
    }
    format!("<saml:NameID{}>{}</saml:NameID>", attrs, xml_escape(&name_id.value))
}

fn conditions_xml(conditions: &Conditions) -> String {
    let mut attrs = String::new();
    if let Some(not_before) = &conditions.not_before {
        attrs.push_str(&format!(r#" NotBefore="{}""#, instant(not_before)));
    }
    if let Some(not_on_or_after) = &conditions.not_on_or_after {
        attrs.push_str(&format!(r#" NotOnOrAfter="{}""#, instant(not_on_or_after)));
    }
    let restrictions: String = conditions
        .audience_restrictions
        .iter()
        .map(|restriction| {
            let audiences: String = restriction
                .audiences
                .iter()
                .map(|a| format!("<saml:Audience>{}</saml:Audience>", xml_escape(a)))
                .collect();
            format!("<saml:AudienceRestriction>{audiences}</saml:AudienceRestriction>")
        })
        .collect();
    format!("<saml:Conditions{attrs}>{restrictions}</saml:Conditions>")
}

fn authn_statement_xml(statement: &AuthnStatement) -> String {
    let mut attrs = format!(r#" AuthnInstant="{}""#, instant(&statement.authn_instant));
    if let Some(session_index) = &statement.session_index {
        attrs.push_str(&format!(r#" SessionIndex="{}""#, xml_escape(session_index)));
    }
    let class_ref = statement
        .authn_context
        .authn_context_class_ref
        .as_deref()
        .map(|class| {
            format!(
                "<saml:AuthnContextClassRef>{}</saml:AuthnContextClassRef>",
                xml_escape(class)
            )
        })
        .unwrap_or_default();
    format!(
        "<saml:AuthnStatement{attrs}><saml:AuthnContext>{class_ref}</saml:AuthnContext></saml:AuthnStatement>"
    )
}

/// Formats a timestamp the way SAML messages expect.
fn instant(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Escapes XML special characters for element and attribute content.
pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
