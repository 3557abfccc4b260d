// Detached compact JWS (RFC 7515 + RFC 7797 unencoded payload) with PS256
//
// Tokens are produced as `header..signature`. Verifiers receive the payload
// out-of-band and splice it into the empty middle segment before checking.

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand_core::OsRng;
use rsa::pss::{BlindedSigningKey, Signature, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::types::{ProtectedHeader, VerificationResult, ALGORITHM};

/// The only critical header extension this implementation understands.
const B64_EXTENSION: &str = "b64";

/// Signs `payload` with PS256 and returns a detached compact JWS.
///
/// The protected header marks the payload as unencoded (`b64: false`) and
/// lists `b64` in `crit`, so the signing input is the base64url header, a
/// dot, and the raw payload bytes.
pub fn sign_detached(private_key: &RsaPrivateKey, payload: &[u8]) -> Result<String> {
    let header_json = serde_json::to_vec(&ProtectedHeader::detached_ps256())?;
    let encoded_header = URL_SAFE_NO_PAD.encode(header_json);

    // Salt length equals the SHA-256 output size, as PS256 requires
    let signing_key = BlindedSigningKey::<Sha256>::new(private_key.clone());
    let signature = signing_key
        .try_sign_with_rng(&mut OsRng, &signing_input(&encoded_header, payload))
        .map_err(|e| anyhow!("PS256 signing failed: {}", e))?;

    Ok(format!(
        "{}..{}",
        encoded_header,
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

/// Inserts `payload` into the empty middle segment of a detached token.
///
/// `header..signature` becomes `header.<payload>.signature`.
pub fn splice_payload(detached: &str, payload: &str) -> Result<String> {
    let mut segments = detached.split('.');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(""), Some(signature), None)
            if !header.is_empty() && !signature.is_empty() =>
        {
            Ok(format!("{}.{}.{}", header, payload, signature))
        }
        _ => Err(anyhow!(
            "Malformed detached JWS: expected 'header..signature'"
        )),
    }
}

/// Verifies a compact JWS whose payload segment has been filled in.
///
/// Returns the decoded protected header and the recovered payload, or an
/// error describing why the token was rejected.
pub fn verify_compact(token: &str, public_key: &RsaPublicKey) -> Result<VerificationResult> {
    let (encoded_header, rest) = token
        .split_once('.')
        .ok_or_else(|| anyhow!("Malformed compact JWS: missing header separator"))?;
    let (payload_segment, encoded_signature) = rest
        .rsplit_once('.')
        .ok_or_else(|| anyhow!("Malformed compact JWS: missing signature separator"))?;

    // RFC 7797 §5.2: an unencoded payload in compact form must not contain '.'
    if payload_segment.contains('.') {
        return Err(anyhow!(
            "Malformed compact JWS: expected exactly three segments"
        ));
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(encoded_header)
        .map_err(|e| anyhow!("Invalid base64url protected header: {}", e))?;
    let header: ProtectedHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| anyhow!("Invalid protected header JSON: {}", e))?;

    if header.alg != ALGORITHM {
        return Err(anyhow!(
            "Unsupported signature algorithm: '{}' (expected '{}')",
            header.alg,
            ALGORITHM
        ));
    }

    let payload_is_encoded = check_critical(&header)?;
    let payload = if payload_is_encoded {
        URL_SAFE_NO_PAD
            .decode(payload_segment)
            .map_err(|e| anyhow!("Invalid base64url payload: {}", e))?
    } else {
        payload_segment.as_bytes().to_vec()
    };

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(encoded_signature)
        .map_err(|e| anyhow!("Invalid base64url signature: {}", e))?;
    let signature = Signature::try_from(signature_bytes.as_slice())
        .map_err(|e| anyhow!("Invalid signature encoding: {}", e))?;

    let verifying_key = VerifyingKey::<Sha256>::new(public_key.clone());
    verifying_key
        .verify(
            &signing_input(encoded_header, payload_segment.as_bytes()),
            &signature,
        )
        .map_err(|_| anyhow!("Signature verification failed: invalid signature"))?;

    Ok(VerificationResult {
        protected_header: header,
        content: String::from_utf8_lossy(&payload).into_owned(),
    })
}

/// Verifies a compact JWS, reporting any failure as `None`.
///
/// A signature that does not verify is an expected outcome, not an error.
pub fn verify(token: &str, public_key: &RsaPublicKey) -> Option<VerificationResult> {
    verify_compact(token, public_key).ok()
}

/// Applies RFC 7515 §4.1.11 `crit` processing and returns whether the
/// payload segment is base64url-encoded.
fn check_critical(header: &ProtectedHeader) -> Result<bool> {
    if let Some(crit) = &header.crit {
        if crit.is_empty() {
            return Err(anyhow!("'crit' header parameter must not be empty"));
        }
        for extension in crit {
            if extension != B64_EXTENSION {
                return Err(anyhow!("Unsupported critical extension: '{}'", extension));
            }
        }
    }

    let listed = header
        .crit
        .as_ref()
        .is_some_and(|crit| crit.iter().any(|e| e == B64_EXTENSION));

    match header.b64 {
        Some(_) if !listed => Err(anyhow!(
            "'b64' header parameter must be listed in 'crit'"
        )),
        Some(encoded) => Ok(encoded),
        None if listed => Err(anyhow!(
            "Critical extension 'b64' is listed but not present"
        )),
        None => Ok(true),
    }
}

fn signing_input(encoded_header: &str, payload: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(encoded_header.len() + 1 + payload.len());
    input.extend_from_slice(encoded_header.as_bytes());
    input.push(b'.');
    input.extend_from_slice(payload);
    input
}
