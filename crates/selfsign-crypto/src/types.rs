//! Type definitions for self-description proofs.
//!
//! A [`Proof`] carries a detached PS256 compact JWS over the SHA-256 digest of
//! a self-description's canonical form, plus the provenance metadata needed to
//! locate the verification key.

use serde::{Deserialize, Serialize};

/// Proof type attached to signed self-descriptions.
pub const PROOF_TYPE: &str = "JsonWebKey2020";

/// Proof purpose attached to signed self-descriptions.
pub const PROOF_PURPOSE: &str = "assertionMethod";

/// JOSE algorithm used for every proof.
pub const ALGORITHM: &str = "PS256";

/// Protected header of a compact JWS.
///
/// Field order is significant: the header is serialized as
/// `{"alg":…,"b64":…,"crit":[…]}` and its base64url form is part of the
/// signing input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtectedHeader {
    /// Signature algorithm, e.g. "PS256"
    pub alg: String,

    /// RFC 7797 payload encoding flag; `Some(false)` means the payload is raw bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64: Option<bool>,

    /// Header parameters the recipient must understand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crit: Option<Vec<String>>,

    /// Any other header parameters, preserved for reporting
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProtectedHeader {
    /// Header for a PS256 signature over an unencoded, detached payload.
    pub fn detached_ps256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            b64: Some(false),
            crit: Some(vec!["b64".to_string()]),
            extra: serde_json::Map::new(),
        }
    }
}

/// Proof of authenticity attached to a self-description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Proof type, always "JsonWebKey2020"
    #[serde(rename = "type")]
    pub proof_type: String,

    /// ISO 8601 timestamp of when the proof was created
    pub created: String,

    /// Proof purpose, always "assertionMethod"
    pub proof_purpose: String,

    /// URI naming the public key that verifies `jws`
    pub verification_method: String,

    /// Detached compact JWS (`header..signature`)
    pub jws: String,
}

impl Proof {
    /// Create a proof with the default type and purpose.
    pub fn new(verification_method: String, created: String, jws: String) -> Self {
        Self {
            proof_type: PROOF_TYPE.to_string(),
            created,
            proof_purpose: PROOF_PURPOSE.to_string(),
            verification_method,
            jws,
        }
    }
}

/// Outcome of a successful JWS verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Decoded protected header of the verified token
    pub protected_header: ProtectedHeader,
    /// Payload recovered from the token, decoded as UTF-8
    pub content: String,
}
