//! End-to-end tests for identity-provider-initiated sign-on.
//!
//! Drives the processor and the HTTP surface with an in-memory resolver
//! and checks the delivered response document itself, not just the
//! transport envelope.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode, Extension, Router};
use quick_xml::events::Event;
use tower::ServiceExt;

use idp_protocol_saml::bindings::saml_decode;
use idp_protocol_saml::defaults::ProtocolDefaults;
use idp_protocol_saml::endpoints::{
    saml_router, AuthenticatedPrincipal, InitiationProcessor, ProcessingStatus, SamlState,
};
use idp_protocol_saml::metadata::{
    AcsEndpoint, IdentityProviderMetadata, MetadataResolver, ServiceProviderMetadata,
};
use idp_protocol_saml::{NameIdFormat, SamlError, SamlResult};

const BASE_URL: &str = "https://idp.example";
const PREFIX: &str = "/saml/idp";

struct MapResolver {
    providers: HashMap<String, ServiceProviderMetadata>,
}

#[async_trait]
impl MetadataResolver for MapResolver {
    async fn resolve_service_provider(
        &self,
        entity_id: &str,
    ) -> SamlResult<ServiceProviderMetadata> {
        self.providers
            .get(entity_id)
            .cloned()
            .ok_or_else(|| SamlError::UnknownServiceProvider(entity_id.to_string()))
    }

    async fn local_identity_provider(
        &self,
        base_url: &str,
    ) -> SamlResult<IdentityProviderMetadata> {
        Ok(IdentityProviderMetadata {
            entity_id: format!("{base_url}{PREFIX}/metadata"),
            single_sign_on_url: format!("{base_url}{PREFIX}/init"),
        })
    }
}

fn processor(providers: Vec<ServiceProviderMetadata>) -> Arc<InitiationProcessor<MapResolver>> {
    let resolver = MapResolver {
        providers: providers
            .into_iter()
            .map(|p| (p.entity_id.clone(), p))
            .collect(),
    };
    Arc::new(InitiationProcessor::new(
        Arc::new(resolver),
        ProtocolDefaults::default(),
        PREFIX,
    ))
}

fn app(
    providers: Vec<ServiceProviderMetadata>,
    principal: Option<AuthenticatedPrincipal>,
) -> Router {
    let state = SamlState::new(processor(providers), BASE_URL);
    Router::new()
        .merge(saml_router(PREFIX))
        .layer(Extension(principal))
        .with_state(state)
}

fn registered_sp() -> ServiceProviderMetadata {
    ServiceProviderMetadata::new(
        "https://sp.example/",
        vec![
            AcsEndpoint::post("https://sp.example/acs-alt"),
            AcsEndpoint::post("https://sp.example/acs").default_endpoint(),
        ],
    )
}

/// Flat view of a parsed XML document for assertions.
struct ParsedDoc {
    /// Element name paired with its attributes.
    elements: Vec<(String, HashMap<String, String>)>,
    /// Text content keyed by the enclosing element name.
    text: Vec<(String, String)>,
}

impl ParsedDoc {
    fn parse(xml: &str) -> Self {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut elements = Vec::new();
        let mut text = Vec::new();
        let mut stack: Vec<String> = Vec::new();
        loop {
            match reader.read_event().expect("well-formed XML") {
                Event::Eof => break,
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    elements.push((name.clone(), attrs(&e)));
                    stack.push(name);
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    elements.push((name, attrs(&e)));
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(t) => {
                    if let Some(parent) = stack.last() {
                        text.push((parent.clone(), t.unescape().unwrap().to_string()));
                    }
                }
                _ => {}
            }
        }
        Self { elements, text }
    }

    fn attr(&self, element: &str, attribute: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(name, _)| name == element)
            .and_then(|(_, attrs)| attrs.get(attribute))
            .map(String::as_str)
    }

    fn count(&self, element: &str) -> usize {
        self.elements.iter().filter(|(name, _)| name == element).count()
    }

    fn text_of(&self, element: &str) -> Option<&str> {
        self.text
            .iter()
            .find(|(name, _)| name == element)
            .map(|(_, t)| t.as_str())
    }
}

fn attrs(e: &quick_xml::events::BytesStart<'_>) -> HashMap<String, String> {
    e.attributes()
        .map(|a| {
            let a = a.unwrap();
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                a.unescape_value().unwrap().to_string(),
            )
        })
        .collect()
}

fn extract_form_field(html: &str, name: &str) -> String {
    let marker = format!(r#"name="{name}" value=""#);
    let start = html.find(&marker).expect("form field present") + marker.len();
    let end = html[start..].find('"').expect("closing quote");
    html[start..start + end].to_string()
}

#[tokio::test]
async fn initiation_delivers_post_form_for_registered_provider() {
    let proc = processor(vec![registered_sp()]);
    let principal = AuthenticatedPrincipal::new("alice");

    let initiation = proc
        .process(BASE_URL, "https://sp.example/", &principal)
        .await
        .unwrap();

    assert_eq!(initiation.status, ProcessingStatus::Stop);
    assert_eq!(initiation.model.action, "https://sp.example/acs");
    assert!(initiation.html.contains(r#"onload="document.forms[0].submit()""#));

    let xml = saml_decode(&initiation.model.saml_response, false).unwrap();
    let doc = ParsedDoc::parse(&xml);

    assert_eq!(doc.count("samlp:Response"), 1);
    assert_eq!(doc.count("saml:Assertion"), 1);
    assert_eq!(doc.attr("samlp:Response", "Version"), Some("2.0"));
    assert_eq!(
        doc.attr("samlp:Response", "Destination"),
        Some("https://sp.example/acs")
    );
    assert_eq!(doc.attr("samlp:Response", "InResponseTo"), None);
    assert_eq!(
        doc.attr("samlp:StatusCode", "Value"),
        Some("urn:oasis:names:tc:SAML:2.0:status:Success")
    );
    assert_eq!(
        doc.text_of("saml:Issuer"),
        Some("https://idp.example/saml/idp/metadata")
    );
}

#[tokio::test]
async fn assertion_binds_principal_with_persistent_name_id() {
    let proc = processor(vec![registered_sp()]);
    let principal = AuthenticatedPrincipal::new("alice");

    let initiation = proc
        .process(BASE_URL, "https://sp.example/", &principal)
        .await
        .unwrap();
    let xml = saml_decode(&initiation.model.saml_response, false).unwrap();
    let doc = ParsedDoc::parse(&xml);

    assert_eq!(doc.text_of("saml:NameID"), Some("alice"));
    assert_eq!(
        doc.attr("saml:NameID", "Format"),
        Some(NameIdFormat::Persistent.uri())
    );
    assert_eq!(doc.text_of("saml:Audience"), Some("https://sp.example/"));
    assert_eq!(
        doc.attr("saml:SubjectConfirmation", "Method"),
        Some("urn:oasis:names:tc:SAML:2.0:cm:bearer")
    );
    assert_eq!(
        doc.attr("saml:SubjectConfirmationData", "Recipient"),
        Some("https://sp.example/acs")
    );
    assert_eq!(doc.attr("saml:SubjectConfirmationData", "InResponseTo"), None);
    assert_eq!(
        doc.text_of("saml:AuthnContextClassRef"),
        Some("urn:oasis:names:tc:SAML:2.0:ac:classes:PreviousSession")
    );
}

#[tokio::test]
async fn endpoint_selection_falls_back_to_first_without_default() {
    let sp = ServiceProviderMetadata::new(
        "https://sp.example/",
        vec![
            AcsEndpoint::post("https://sp.example/first"),
            AcsEndpoint::post("https://sp.example/second"),
        ],
    );
    let proc = processor(vec![sp]);
    let principal = AuthenticatedPrincipal::new("alice");

    let initiation = proc
        .process(BASE_URL, "https://sp.example/", &principal)
        .await
        .unwrap();
    assert_eq!(initiation.model.action, "https://sp.example/first");
}

#[tokio::test]
async fn repeated_initiations_agree_up_to_identifiers() {
    let proc = processor(vec![registered_sp()]);
    let principal = AuthenticatedPrincipal::new("alice");

    let first = proc
        .process(BASE_URL, "https://sp.example/", &principal)
        .await
        .unwrap();
    let second = proc
        .process(BASE_URL, "https://sp.example/", &principal)
        .await
        .unwrap();

    let doc1 = ParsedDoc::parse(&saml_decode(&first.model.saml_response, false).unwrap());
    let doc2 = ParsedDoc::parse(&saml_decode(&second.model.saml_response, false).unwrap());

    assert_eq!(first.model.action, second.model.action);
    assert_eq!(doc1.text_of("saml:NameID"), doc2.text_of("saml:NameID"));
    assert_eq!(doc1.text_of("saml:Audience"), doc2.text_of("saml:Audience"));
    assert_ne!(
        doc1.attr("samlp:Response", "ID"),
        doc2.attr("samlp:Response", "ID")
    );
    assert_ne!(
        doc1.attr("saml:Assertion", "ID"),
        doc2.attr("saml:Assertion", "ID")
    );
}

#[tokio::test]
async fn http_flow_returns_auto_submit_form() {
    let app = app(vec![registered_sp()], Some(AuthenticatedPrincipal::new("alice")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/saml/idp/init?sp=https%3A%2F%2Fsp.example%2F")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    assert!(html.contains(r#"action="https://sp.example/acs""#));
    let encoded = extract_form_field(&html, "SAMLResponse");
    let xml = saml_decode(&encoded, false).unwrap();
    assert!(xml.contains("<samlp:Response"));
}

#[tokio::test]
async fn missing_sp_parameter_is_not_claimed() {
    let app = app(vec![registered_sp()], Some(AuthenticatedPrincipal::new("alice")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/saml/idp/init")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_provider_reports_not_found() {
    let app = app(vec![], Some(AuthenticatedPrincipal::new("alice")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/saml/idp/init?sp=https%3A%2F%2Fnobody.example%2F")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unauthenticated_request_is_rejected() {
    let app = app(vec![registered_sp()], None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/saml/idp/init?sp=https%3A%2F%2Fsp.example%2F")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn provider_without_endpoints_is_an_explicit_error() {
    let bare = ServiceProviderMetadata::new("https://sp.example/", Vec::new());
    let app = app(vec![bare], Some(AuthenticatedPrincipal::new("alice")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/saml/idp/init?sp=https%3A%2F%2Fsp.example%2F")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn metadata_endpoint_serves_descriptor() {
    let app = app(vec![], None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/saml/idp/metadata")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/samlmetadata+xml"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let xml = String::from_utf8(body.to_vec()).unwrap();
    assert!(xml.contains(r#"entityID="https://idp.example/saml/idp/metadata""#));
    assert!(xml.contains("https://idp.example/saml/idp/init"));
}
