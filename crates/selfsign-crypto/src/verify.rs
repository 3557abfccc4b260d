// Proof verification for self-descriptions
//
// This module checks a Proof against the digest it claims to cover.

use anyhow::{anyhow, Result};
use rsa::RsaPublicKey;

use crate::jws::{splice_payload, verify_compact};
use crate::types::{Proof, VerificationResult, PROOF_PURPOSE, PROOF_TYPE};

/// Verifies a proof against a digest using the provided public key.
///
/// This function:
/// 1. Checks the proof type and purpose
/// 2. Splices the digest into the detached JWS
/// 3. Verifies the PS256 signature
/// 4. Checks that the recovered payload equals the digest
///
/// # Returns
/// The verification result if every step succeeds, Err with details otherwise
pub fn check_proof(
    proof: &Proof,
    digest: &str,
    public_key: &RsaPublicKey,
) -> Result<VerificationResult> {
    if proof.proof_type != PROOF_TYPE {
        return Err(anyhow!(
            "Unsupported proof type: '{}' (expected '{}')",
            proof.proof_type,
            PROOF_TYPE
        ));
    }

    if proof.proof_purpose != PROOF_PURPOSE {
        return Err(anyhow!(
            "Unsupported proof purpose: '{}' (expected '{}')",
            proof.proof_purpose,
            PROOF_PURPOSE
        ));
    }

    let token = splice_payload(&proof.jws, digest)?;
    let result = verify_compact(&token, public_key)?;

    if result.content != digest {
        return Err(anyhow!(
            "Digest mismatch: proof covers '{}', expected '{}'",
            result.content,
            digest
        ));
    }

    Ok(result)
}

/// Verifies a proof against a digest, reporting any failure as `None`.
pub fn verify_proof(
    proof: &Proof,
    digest: &str,
    public_key: &RsaPublicKey,
) -> Option<VerificationResult> {
    check_proof(proof, digest, public_key).ok()
}
