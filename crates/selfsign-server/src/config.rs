//! Signer configuration.
//!
//! Key material and collaborator URLs are passed to the pipeline explicitly.
//! [`SignerConfig::from_env`] is the process-level loader used by the binary.

use url::Url;

/// Default base URL of both the normalizer and the compliance authority.
pub const DEFAULT_COMPLIANCE_URL: &str = "http://compliance.gaia-x.eu/api/v2204";

/// Default per-request timeout for remote calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default provenance note injected into `credentialSubject`.
pub const DEFAULT_PROVENANCE_NOTE: &str = "Self Description signed by selfsign";

/// Configuration for the signing pipeline.
///
/// Custom `Debug` implementation redacts the private key.
#[derive(Clone)]
pub struct SignerConfig {
    /// PKCS#8 PEM RSA private key used for PS256.
    pub private_key_pem: String,
    /// URI naming the public key that verifies the proof.
    pub verification_method: String,
    /// X.509 certificate (or SPKI public key) PEM for the local self-check.
    pub certificate_pem: String,
    /// Base URL of the normalization service.
    pub normalizer_url: Url,
    /// Base URL of the compliance authority.
    pub compliance_url: Url,
    /// Timeout applied to every remote request.
    pub request_timeout_secs: u64,
    /// Text of the provenance note.
    pub provenance_note: String,
    /// Abort the run when the local self-check fails instead of only logging it.
    pub strict_local_verification: bool,
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("private_key_pem", &"[REDACTED]")
            .field("verification_method", &self.verification_method)
            .field("certificate_pem", &format!("<{} bytes>", self.certificate_pem.len()))
            .field("normalizer_url", &self.normalizer_url)
            .field("compliance_url", &self.compliance_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("provenance_note", &self.provenance_note)
            .field("strict_local_verification", &self.strict_local_verification)
            .finish()
    }
}

impl SignerConfig {
    /// Create a configuration with default timeout, note and lenient self-check.
    pub fn new(
        private_key_pem: String,
        verification_method: String,
        certificate_pem: String,
        normalizer_url: Url,
        compliance_url: Url,
    ) -> Self {
        Self {
            private_key_pem,
            verification_method,
            certificate_pem,
            normalizer_url,
            compliance_url,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            provenance_note: DEFAULT_PROVENANCE_NOTE.to_string(),
            strict_local_verification: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PRIVATE_KEY` (required)
    /// - `VERIFICATION_METHOD` (required)
    /// - `CERTIFICATE` (required)
    /// - `NORMALIZER_URL` (default: `http://compliance.gaia-x.eu/api/v2204`)
    /// - `COMPLIANCE_URL` (default: `http://compliance.gaia-x.eu/api/v2204`)
    /// - `REQUEST_TIMEOUT_SECS` (default: 30)
    /// - `PROVENANCE_NOTE` (default: `Self Description signed by selfsign`)
    /// - `STRICT_LOCAL_VERIFICATION` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
        };
        let url = |name: &str| -> Result<Url, ConfigError> {
            let raw = lookup(name).unwrap_or_else(|| DEFAULT_COMPLIANCE_URL.to_string());
            let parsed = Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))?;
            // Endpoint paths are appended to the base
            if parsed.query().is_some() || parsed.fragment().is_some() {
                return Err(ConfigError::InvalidUrl(
                    name.to_string(),
                    "base URL must not carry a query or fragment".to_string(),
                ));
            }
            Ok(parsed)
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), raw))?,
        };

        let strict_local_verification = match lookup("STRICT_LOCAL_VERIFICATION") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidValue("STRICT_LOCAL_VERIFICATION".to_string(), raw)
            })?,
        };

        Ok(Self {
            private_key_pem: required("PRIVATE_KEY")?,
            verification_method: required("VERIFICATION_METHOD")?,
            certificate_pem: required("CERTIFICATE")?,
            normalizer_url: url("NORMALIZER_URL")?,
            compliance_url: url("COMPLIANCE_URL")?,
            request_timeout_secs,
            provenance_note: lookup("PROVENANCE_NOTE")
                .unwrap_or_else(|| DEFAULT_PROVENANCE_NOTE.to_string()),
            strict_local_verification,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(String),

    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    #[error("invalid value for {0}: '{1}'")]
    InvalidValue(String, String),

    #[error("unusable key material in {name}: {reason}")]
    InvalidKeyMaterial { name: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
