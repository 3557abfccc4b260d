// Proof signing for self-descriptions
//
// This module turns the digest of a canonical form into a Proof carrying a
// detached PS256 signature.

use anyhow::Result;
use rsa::RsaPrivateKey;

use crate::jws::sign_detached;
use crate::types::Proof;

/// Signs a digest and packages the signature into a Proof.
///
/// The digest's UTF-8 bytes are the JWS payload. The payload is detached, so
/// `proof.jws` has the form `header..signature` and verifiers must splice the
/// same digest back in.
///
/// # Arguments
/// * `private_key` - RSA private key used for PS256
/// * `digest` - Hex SHA-256 digest of the canonical form
/// * `verification_method` - URI naming the matching public key
/// * `created` - ISO 8601 timestamp of the signing operation
pub fn create_proof(
    private_key: &RsaPrivateKey,
    digest: &str,
    verification_method: String,
    created: String,
) -> Result<Proof> {
    let jws = sign_detached(private_key, digest.as_bytes())?;
    Ok(Proof::new(verification_method, created, jws))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256_hex;
    use crate::keys::load_signing_key;

    #[test]
    fn test_create_proof_fills_provenance() {
        let private_key =
            load_signing_key(include_str!("../tests/fixtures/signer_key.pem")).unwrap();
        let digest = sha256_hex(b"canonical form");

        let proof = create_proof(
            &private_key,
            &digest,
            "did:web:example.com#JWK2020-RSA".to_string(),
            "2026-01-30T12:00:00.000Z".to_string(),
        )
        .expect("signing should succeed");

        assert_eq!(proof.proof_type, "JsonWebKey2020");
        assert_eq!(proof.proof_purpose, "assertionMethod");
        assert_eq!(proof.verification_method, "did:web:example.com#JWK2020-RSA");
        assert_eq!(proof.created, "2026-01-30T12:00:00.000Z");
        assert!(proof.jws.contains(".."));
        // The digest itself is never embedded in the token
        assert!(!proof.jws.contains(&digest));
    }

    #[test]
    fn test_pss_signatures_are_randomized() {
        let private_key =
            load_signing_key(include_str!("../tests/fixtures/signer_key.pem")).unwrap();
        let digest = sha256_hex(b"canonical form");

        let a = create_proof(&private_key, &digest, "vm".into(), "t".into()).unwrap();
        let b = create_proof(&private_key, &digest, "vm".into(), "t".into()).unwrap();

        assert_ne!(a.jws, b.jws);
    }
}
