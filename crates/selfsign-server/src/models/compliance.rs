//! Compliance authority artifacts and the pipeline's final result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::self_description::SelfDescriptionCredential;

/// A signed self-description bundled with the authority's compliance credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedSelfDescription {
    pub self_description_credential: SelfDescriptionCredential,
    /// Opaque credential issued by the compliance authority.
    pub compliance_credential: Value,
}

/// Verdict returned by the compliance authority's verification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerification {
    pub conforms: bool,
    /// Remaining verdict fields (shape, content and validation details).
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Successful outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedResult {
    pub signed_self_description: SignedSelfDescription,
    pub result: ComplianceVerification,
}
