//! Self-description document model and type classification.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use selfsign_crypto::Proof;

/// Generic wrapper tag present on every verifiable credential.
pub const WRAPPER_TYPE: &str = "VerifiableCredential";

/// Reasons a self-description is rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("self-description must be a JSON object")]
    NotAnObject,

    #[error("missing '@type' field")]
    MissingType,

    #[error("'@type' must be a non-empty array of strings")]
    InvalidType,

    #[error("missing 'credentialSubject' field")]
    MissingCredentialSubject,

    #[error("'credentialSubject' must be a JSON object")]
    InvalidCredentialSubject,
}

/// Semantic type of a self-description, selecting the compliance sub-API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentType {
    /// `LegalPerson` participants.
    LegalPerson,
    /// `ServiceOfferingExperimental` service offerings.
    ServiceOffering,
    /// Any other tag, or no tag besides the wrapper. Routed as a participant.
    Fallback { tag: Option<String> },
}

impl DocumentType {
    /// Selects the first tag that is not the wrapper tag and maps it to a type.
    pub fn classify(types: &[String]) -> Result<Self, DocumentError> {
        if types.is_empty() {
            return Err(DocumentError::InvalidType);
        }

        let tag = types.iter().map(String::as_str).find(|t| *t != WRAPPER_TYPE);
        Ok(match tag {
            Some("LegalPerson") => DocumentType::LegalPerson,
            Some("ServiceOfferingExperimental") => DocumentType::ServiceOffering,
            other => DocumentType::Fallback {
                tag: other.map(str::to_string),
            },
        })
    }

    /// Path segment of the compliance authority sub-API for this type.
    pub fn api_segment(&self) -> &'static str {
        match self {
            DocumentType::ServiceOffering => "service-offering",
            DocumentType::LegalPerson | DocumentType::Fallback { .. } => "participant",
        }
    }

    /// `credentialSubject` key under which the provenance note is stored.
    pub fn note_key(&self) -> String {
        format!("gx-{}:note", self.api_segment())
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Fallback { tag: Some(tag) } => {
                write!(f, "{} (fallback for '{}')", self.api_segment(), tag)
            }
            _ => write!(f, "{}", self.api_segment()),
        }
    }
}

/// A self-description document.
///
/// Only `@type` and `credentialSubject` are interpreted; every other field is
/// carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDescription {
    /// Type tags, e.g. `["VerifiableCredential", "LegalPerson"]`.
    #[serde(rename = "@type")]
    pub types: Vec<String>,

    /// Subject of the credential; provenance notes are added here.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: Map<String, Value>,

    /// Fields the pipeline does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SelfDescription {
    /// Builds a typed document from untyped JSON.
    ///
    /// Any incoming `proof` is dropped; the document is always re-signed.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut fields) = value else {
            return Err(DocumentError::NotAnObject);
        };

        let types = match fields.remove("@type") {
            None => return Err(DocumentError::MissingType),
            Some(Value::Array(items)) if !items.is_empty() => items
                .into_iter()
                .map(|item| match item {
                    Value::String(tag) => Ok(tag),
                    _ => Err(DocumentError::InvalidType),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(DocumentError::InvalidType),
        };

        let credential_subject = match fields.remove("credentialSubject") {
            None => return Err(DocumentError::MissingCredentialSubject),
            Some(Value::Object(subject)) => subject,
            Some(_) => return Err(DocumentError::InvalidCredentialSubject),
        };

        // The canonical form must not carry a proof from an earlier run.
        fields.remove("proof");

        Ok(Self {
            types,
            credential_subject,
            extra: fields,
        })
    }

    /// Classifies this document by its `@type` tags.
    pub fn document_type(&self) -> Result<DocumentType, DocumentError> {
        DocumentType::classify(&self.types)
    }

    /// Stores the provenance note under the type-namespaced key.
    ///
    /// Repeated calls overwrite the same key.
    pub fn annotate(&mut self, document_type: &DocumentType, note: &str) {
        self.credential_subject.insert(
            document_type.note_key(),
            json!({
                "@value": note,
                "@type": "xsd:string"
            }),
        );
    }
}

/// A self-description with its proof attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfDescriptionCredential {
    #[serde(flatten)]
    pub document: SelfDescription,
    pub proof: Proof,
}

impl SelfDescriptionCredential {
    /// Attaches `proof`, replacing any `proof` field the document already had.
    pub fn new(mut document: SelfDescription, proof: Proof) -> Self {
        document.extra.remove("proof");
        Self { document, proof }
    }
}
