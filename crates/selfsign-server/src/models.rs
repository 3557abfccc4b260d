//! Document and result models for the signing pipeline.

pub mod compliance;
pub mod self_description;

pub use compliance::{ComplianceVerification, SignedResult, SignedSelfDescription};
pub use self_description::{
    DocumentError, DocumentType, SelfDescription, SelfDescriptionCredential,
};
