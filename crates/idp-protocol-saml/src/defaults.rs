//! Protocol defaults for assertion and response construction.
//!
//! Centralizes the choices an identity provider makes when it builds a
//! message without an inbound request to mirror: validity windows,
//! confirmation method, and authentication context.

use crate::metadata::{IdentityProviderMetadata, ServiceProviderMetadata};
use crate::types::{
    Assertion, AuthnContextClass, AuthnStatement, Conditions, NameId, NameIdFormat, Response,
    ResponseBuilder, Subject, SubjectConfirmation, SubjectConfirmationData,
};

/// Default construction rules for outgoing protocol messages.
#[derive(Debug, Clone)]
pub struct ProtocolDefaults {
    /// How long an issued assertion remains valid.
    pub assertion_validity: chrono::Duration,
}

impl Default for ProtocolDefaults {
    fn default() -> Self {
        Self {
            assertion_validity: chrono::Duration::minutes(5),
        }
    }
}

impl ProtocolDefaults {
    /// Builds an assertion binding `subject_name` to the recipient.
    ///
    /// The issuer is the local identity provider, the audience is the
    /// recipient's entity ID, and the bearer confirmation is addressed to
    /// the recipient's preferred assertion consumer endpoint when one is
    /// declared. `in_response_to` is `None` for unsolicited assertions.
    #[must_use]
    pub fn assertion(
        &self,
        recipient: &ServiceProviderMetadata,
        issuer: &IdentityProviderMetadata,
        in_response_to: Option<&str>,
        subject_name: &str,
        name_id_format: NameIdFormat,
    ) -> Assertion {
        let name_id = NameId::new(subject_name)
            .with_format(name_id_format)
            .with_name_qualifier(issuer.entity_id.clone())
            .with_sp_name_qualifier(recipient.entity_id.clone());

        let mut confirmation_data = recipient
            .preferred_acs()
            .map(|acs| SubjectConfirmationData::for_recipient(&acs.location, self.assertion_validity))
            .unwrap_or_default();
        confirmation_data.in_response_to = in_response_to.map(String::from);

        Assertion::new(issuer.entity_id.clone())
            .with_subject(
                Subject::new(name_id)
                    .with_confirmation(SubjectConfirmation::bearer().with_data(confirmation_data)),
            )
            .with_conditions(
                Conditions::valid_for(self.assertion_validity)
                    .with_audience(recipient.entity_id.clone()),
            )
            .with_authn_statement(AuthnStatement::new(AuthnContextClass::PreviousSession))
    }

    /// Wraps a single assertion in a response addressed to the recipient.
    ///
    /// `in_response_to` is `None` for unsolicited responses.
    #[must_use]
    pub fn response(
        &self,
        in_response_to: Option<&str>,
        assertion: Assertion,
        recipient: &ServiceProviderMetadata,
        issuer: &IdentityProviderMetadata,
    ) -> Response {
        let mut builder = ResponseBuilder::new(issuer.entity_id.clone()).assertion(assertion);
        if let Some(request_id) = in_response_to {
            builder = builder.in_response_to(request_id);
        }
        if let Ok(acs) = recipient.preferred_acs() {
            builder = builder.destination(acs.location.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::AcsEndpoint;

    fn recipient() -> ServiceProviderMetadata {
        ServiceProviderMetadata::new(
            "https://sp.example/",
            vec![AcsEndpoint::post("https://sp.example/acs").default_endpoint()],
        )
    }

    fn issuer() -> IdentityProviderMetadata {
        IdentityProviderMetadata {
            entity_id: "https://idp.example/saml/idp/metadata".to_string(),
            single_sign_on_url: "https://idp.example/saml/idp/init".to_string(),
        }
    }

    #[test]
    fn assertion_binds_subject_to_recipient() {
        let defaults = ProtocolDefaults::default();
        let assertion =
            defaults.assertion(&recipient(), &issuer(), None, "alice", NameIdFormat::Persistent);

        assert_eq!(assertion.issuer, issuer().entity_id);
        assert_eq!(assertion.audiences(), vec!["https://sp.example/"]);

        let name_id = assertion.name_id().unwrap();
        assert_eq!(name_id.value, "alice");
        assert_eq!(name_id.parsed_format(), NameIdFormat::Persistent);

        let confirmation = &assertion.subject.as_ref().unwrap().subject_confirmations[0];
        let data = confirmation.subject_confirmation_data.as_ref().unwrap();
        assert_eq!(data.recipient.as_deref(), Some("https://sp.example/acs"));
        assert!(data.in_response_to.is_none());
    }

    #[test]
    fn response_wraps_one_uncorrelated_assertion() {
        let defaults = ProtocolDefaults::default();
        let assertion =
            defaults.assertion(&recipient(), &issuer(), None, "alice", NameIdFormat::Persistent);
        let response = defaults.response(None, assertion, &recipient(), &issuer());

        assert!(response.is_success());
        assert!(response.in_response_to.is_none());
        assert_eq!(response.assertions.len(), 1);
        assert_eq!(response.issuer, issuer().entity_id);
        assert_eq!(response.destination.as_deref(), Some("https://sp.example/acs"));
    }

    #[test]
    fn response_without_endpoints_has_no_destination() {
        let defaults = ProtocolDefaults::default();
        let bare = ServiceProviderMetadata::new("https://sp.example/", Vec::new());
        let assertion = defaults.assertion(&bare, &issuer(), None, "alice", NameIdFormat::Persistent);
        let response = defaults.response(None, assertion, &bare, &issuer());
        assert!(response.destination.is_none());
    }
}
