//! Client for the normalization service.
//!
//! `POST {base}/normalize` takes the document as JSON and answers with its
//! canonical form as text. The canonical form is opaque here; only its bytes
//! matter for hashing.

use serde::Serialize;
use url::Url;

use super::{endpoint_url, post_json, ClientError};

#[derive(Debug, Clone)]
pub struct NormalizerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NormalizerClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Requests the canonical form of `document`.
    pub async fn normalize<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<String, ClientError> {
        let url = endpoint_url(&self.base_url, "normalize");
        post_json(&self.http, &url, "POST /normalize", document).await
    }
}
