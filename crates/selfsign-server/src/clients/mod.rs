//! HTTP clients for the external collaborators of the signing pipeline.
//!
//! Both the normalizer and the compliance authority are plain JSON-over-HTTP
//! services. Requests are never retried: an authority rejection is a domain
//! answer, and a transport failure aborts the pipeline run that issued it.
//! The per-request timeout comes from the shared `reqwest::Client`.

pub mod compliance;
pub mod normalizer;

pub use compliance::ComplianceClient;
pub use normalizer::NormalizerClient;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Errors from calls to the normalizer or the compliance authority.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, including timeouts.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The remote service answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// A 2xx response whose body did not have the expected shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        body: String,
        source: serde_json::Error,
    },
}

impl ClientError {
    /// The remote error body, verbatim, when the service answered with an error status.
    ///
    /// JSON bodies are returned as parsed JSON; anything else as a JSON string.
    pub fn payload(&self) -> Option<Value> {
        match self {
            ClientError::Api { body, .. } => {
                Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.clone())))
            }
            ClientError::Http { .. } | ClientError::Deserialization { .. } => None,
        }
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Http { source, .. } if source.is_timeout())
    }
}

/// Joins `path` onto `base`, keeping any path prefix `base` already has.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

/// POSTs `body` as JSON and returns the response text of a 2xx answer.
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    http: &reqwest::Client,
    url: &str,
    endpoint: &str,
    body: &T,
) -> Result<String, ClientError> {
    let resp = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| ClientError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

    let status = resp.status();
    let text = resp.text().await.map_err(|e| ClientError::Http {
        endpoint: endpoint.into(),
        source: e,
    })?;

    if !status.is_success() {
        return Err(ClientError::Api {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(text)
}

/// Decodes a JSON response body, keeping the body for error reporting.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, body: String) -> Result<T, ClientError> {
    serde_json::from_str(&body).map_err(|e| ClientError::Deserialization {
        endpoint: endpoint.into(),
        body,
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let base: Url = "http://compliance.gaia-x.eu/api/v2204".parse().unwrap();
        assert_eq!(
            endpoint_url(&base, "participant/verify/raw"),
            "http://compliance.gaia-x.eu/api/v2204/participant/verify/raw"
        );

        let root: Url = "http://127.0.0.1:8080".parse().unwrap();
        assert_eq!(endpoint_url(&root, "sign"), "http://127.0.0.1:8080/sign");

        let trailing: Url = "http://127.0.0.1:8080/api/".parse().unwrap();
        assert_eq!(endpoint_url(&trailing, "normalize"), "http://127.0.0.1:8080/api/normalize");
    }

    #[test]
    fn test_api_error_payload_is_verbatim_json() {
        let err = ClientError::Api {
            endpoint: "POST /sign".into(),
            status: 400,
            body: r#"{"error":"bad schema"}"#.into(),
        };
        assert_eq!(err.payload(), Some(json!({ "error": "bad schema" })));
    }

    #[test]
    fn test_api_error_payload_falls_back_to_string() {
        let err = ClientError::Api {
            endpoint: "POST /normalize".into(),
            status: 500,
            body: "upstream exploded".into(),
        };
        assert_eq!(err.payload(), Some(json!("upstream exploded")));
    }

    #[test]
    fn test_deserialization_error_has_no_payload() {
        let result: Result<Value, _> = decode("POST /sign", "not json".to_string());
        let err = result.unwrap_err();

        assert!(err.payload().is_none());
        assert!(err.to_string().contains("POST /sign"));
    }
}
