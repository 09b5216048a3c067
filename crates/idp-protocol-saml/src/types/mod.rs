//! SAML 2.0 types and data structures.
//!
//! Core protocol types used to assemble an unsolicited response:
//! assertions, responses, name identifiers, status, and the constants
//! defined by the SAML 2.0 specification.

mod assertion;
mod constants;
mod name_id;
mod response;
mod status;

pub use assertion::*;
pub use constants::*;
pub use name_id::*;
pub use response::*;
pub use status::*;
