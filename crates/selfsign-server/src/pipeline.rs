//! Self-description signing pipeline.
//!
//! One run moves a document through
//! `Classified → Canonicalized → Digested → LocallySigned → LocallyVerified →
//! RemotelySigned → RemotelyVerified → Done`. Any collaborator failure aborts
//! the run; the stage reached is logged with the error. Runs share nothing
//! mutable; the key material is loaded once and only read afterwards.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use selfsign_crypto::{
    check_proof, create_proof, is_key_pair, load_public_key, load_signing_key, sha256_hex,
    RsaPrivateKey, RsaPublicKey,
};

use crate::clients::{ClientError, ComplianceClient, NormalizerClient};
use crate::config::{ConfigError, SignerConfig};
use crate::models::{
    DocumentError, SelfDescription, SelfDescriptionCredential, SignedResult,
    SignedSelfDescription,
};

/// Stage a pipeline run has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Classified,
    Canonicalized,
    Digested,
    LocallySigned,
    LocallyVerified,
    RemotelySigned,
    RemotelyVerified,
    Done,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::Classified => "classified",
            PipelineStage::Canonicalized => "canonicalized",
            PipelineStage::Digested => "digested",
            PipelineStage::LocallySigned => "locally_signed",
            PipelineStage::LocallyVerified => "locally_verified",
            PipelineStage::RemotelySigned => "remotely_signed",
            PipelineStage::RemotelyVerified => "remotely_verified",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Reasons a pipeline run is aborted.
///
/// A non-conforming verdict from the authority is not an error; it is
/// returned in [`SignedResult::result`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("malformed self-description: {0}")]
    MalformedDocument(#[from] DocumentError),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("local verification failed: {0}")]
    LocalVerification(String),

    #[error(transparent)]
    Collaborator(#[from] ClientError),
}

/// Signs self-descriptions and round-trips them through the compliance authority.
pub struct Pipeline {
    signing_key: RsaPrivateKey,
    certificate_key: RsaPublicKey,
    verification_method: String,
    provenance_note: String,
    strict_local_verification: bool,
    normalizer: NormalizerClient,
    compliance: ComplianceClient,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("signing_key", &"[REDACTED]")
            .field("verification_method", &self.verification_method)
            .field("strict_local_verification", &self.strict_local_verification)
            .field("normalizer", &self.normalizer)
            .field("compliance", &self.compliance)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Loads key material and builds the collaborator clients.
    pub fn new(config: SignerConfig) -> Result<Self, ConfigError> {
        if config.verification_method.trim().is_empty() {
            return Err(ConfigError::MissingVar("VERIFICATION_METHOD".to_string()));
        }

        let signing_key = load_signing_key(&config.private_key_pem).map_err(|e| {
            ConfigError::InvalidKeyMaterial {
                name: "PRIVATE_KEY",
                reason: e.to_string(),
            }
        })?;
        let certificate_key = load_public_key(&config.certificate_pem).map_err(|e| {
            ConfigError::InvalidKeyMaterial {
                name: "CERTIFICATE",
                reason: e.to_string(),
            }
        })?;

        if !is_key_pair(&signing_key, &certificate_key) {
            tracing::warn!(
                verification_method = %config.verification_method,
                "certificate does not match the signing key; local verification will fail"
            );
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            signing_key,
            certificate_key,
            verification_method: config.verification_method,
            provenance_note: config.provenance_note,
            strict_local_verification: config.strict_local_verification,
            normalizer: NormalizerClient::new(http.clone(), config.normalizer_url),
            compliance: ComplianceClient::new(http, config.compliance_url),
        })
    }

    /// Runs the full pipeline for one self-description.
    ///
    /// Returns either the complete signed bundle with the authority's verdict
    /// or the error that aborted the run; there is no partial result.
    pub async fn sign_self_description(
        &self,
        self_description: Value,
    ) -> Result<SignedResult, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sign_self_description", %run_id);

        let mut stage = PipelineStage::Received;
        let outcome = self
            .execute(self_description, &mut stage)
            .instrument(span.clone())
            .await;

        span.in_scope(|| match &outcome {
            Ok(signed) => tracing::info!(conforms = signed.result.conforms, "pipeline finished"),
            Err(e) => tracing::warn!(aborted_after = %stage, error = %e, "pipeline aborted"),
        });
        outcome
    }

    async fn execute(
        &self,
        self_description: Value,
        stage: &mut PipelineStage,
    ) -> Result<SignedResult, PipelineError> {
        let mut document = SelfDescription::from_value(self_description)?;
        let document_type = document.document_type()?;
        *stage = PipelineStage::Classified;
        tracing::debug!(document_type = %document_type, "classified self-description");

        document.annotate(&document_type, &self.provenance_note);

        let canonical = self.normalizer.normalize(&document).await?;
        *stage = PipelineStage::Canonicalized;
        if canonical.is_empty() {
            tracing::warn!("normalizer returned an empty canonical form");
        }

        let digest = sha256_hex(canonical.as_bytes());
        *stage = PipelineStage::Digested;
        tracing::info!(%digest, "hashed canonical self-description");

        let proof = create_proof(
            &self.signing_key,
            &digest,
            self.verification_method.clone(),
            now_iso8601(),
        )
        .map_err(|e| PipelineError::Signing(e.to_string()))?;
        *stage = PipelineStage::LocallySigned;
        tracing::info!("self-description signed locally");

        // The authority's check is authoritative; the local one is diagnostic
        // unless strict mode is configured.
        match check_proof(&proof, &digest, &self.certificate_key) {
            Ok(_) => tracing::info!("local verification succeeded"),
            Err(e) if self.strict_local_verification => {
                return Err(PipelineError::LocalVerification(e.to_string()));
            }
            Err(e) => tracing::warn!(error = %e, "local verification failed"),
        }
        *stage = PipelineStage::LocallyVerified;

        tracing::info!("requesting compliance credential");
        let credential = SelfDescriptionCredential::new(document, proof);
        let compliance_credential = self.compliance.sign(&credential).await?;
        *stage = PipelineStage::RemotelySigned;
        tracing::info!("compliance credential issued");

        let verify_type = credential.document.document_type()?;
        let signed = SignedSelfDescription {
            self_description_credential: credential,
            compliance_credential,
        };
        let result = self.compliance.verify(&verify_type, &signed).await?;
        *stage = PipelineStage::RemotelyVerified;

        if result.conforms {
            tracing::info!("compliance verification succeeded");
        } else {
            tracing::warn!("compliance authority reports non-conformance");
        }

        *stage = PipelineStage::Done;
        Ok(SignedResult {
            signed_self_description: signed,
            result,
        })
    }
}

/// ISO 8601 UTC timestamp with millisecond precision, e.g. `2026-01-30T12:00:00.000Z`.
fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
