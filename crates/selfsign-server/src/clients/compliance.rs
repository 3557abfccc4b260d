//! Client for the compliance authority.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/sign` | Issue a compliance credential for a signed self-description |
//! | POST   | `/{segment}/verify/raw` | Verify a self-description + compliance credential bundle |

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{decode, endpoint_url, post_json, ClientError};
use crate::models::{
    ComplianceVerification, DocumentType, SelfDescriptionCredential, SignedSelfDescription,
};

/// Response of the signing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignResponse {
    compliance_credential: Value,
}

#[derive(Debug, Clone)]
pub struct ComplianceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ComplianceClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Submits a signed self-description and returns the issued compliance credential.
    ///
    /// Calls `POST {base_url}/sign` with the document and its `proof`.
    pub async fn sign(&self, credential: &SelfDescriptionCredential) -> Result<Value, ClientError> {
        let endpoint = "POST /sign";
        let url = endpoint_url(&self.base_url, "sign");

        let body = post_json(&self.http, &url, endpoint, credential).await?;
        let response: SignResponse = decode(endpoint, body)?;
        Ok(response.compliance_credential)
    }

    /// Asks the authority to verify a signed bundle.
    ///
    /// Calls `POST {base_url}/{segment}/verify/raw`, the segment chosen by
    /// `document_type`.
    pub async fn verify(
        &self,
        document_type: &DocumentType,
        bundle: &SignedSelfDescription,
    ) -> Result<ComplianceVerification, ClientError> {
        let path = format!("{}/verify/raw", document_type.api_segment());
        let endpoint = format!("POST /{}", path);
        let url = endpoint_url(&self.base_url, &path);

        let body = post_json(&self.http, &url, &endpoint, bundle).await?;
        decode(&endpoint, body)
    }
}
