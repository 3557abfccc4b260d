// Roundtrip test for proof signing and verification
//
// This test validates that:
// 1. A proof over a digest verifies once the digest is spliced back in
// 2. Tampering with the digest or the signature fails verification
// 3. A key that does not match fails verification

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use selfsign_crypto::jws::verify;
use selfsign_crypto::{
    create_proof, load_certificate_key, load_signing_key, sha256_hex, splice_payload,
    verify_proof, RsaPrivateKey, RsaPublicKey,
};

const SIGNER_KEY: &str = include_str!("fixtures/signer_key.pem");
const SIGNER_CERT: &str = include_str!("fixtures/signer_cert.pem");
const OTHER_CERT: &str = include_str!("fixtures/other_cert.pem");

fn signer() -> (RsaPrivateKey, RsaPublicKey) {
    (
        load_signing_key(SIGNER_KEY).expect("signer key"),
        load_certificate_key(SIGNER_CERT).expect("signer certificate"),
    )
}

/// Replaces the hex character at `index` with a different hex character.
fn flip_hex_char(digest: &str, index: usize) -> String {
    let mut chars: Vec<char> = digest.chars().collect();
    chars[index] = if chars[index] == '0' { '1' } else { '0' };
    chars.into_iter().collect()
}

/// Flips one bit of the decoded signature and re-encodes the token.
fn flip_signature_byte(token: &str, index: usize) -> String {
    let (head, encoded_signature) = token.rsplit_once('.').unwrap();
    let mut signature = URL_SAFE_NO_PAD.decode(encoded_signature).unwrap();
    signature[index] ^= 0x01;
    format!("{}.{}", head, URL_SAFE_NO_PAD.encode(signature))
}

#[test]
fn test_signing_roundtrip() {
    let (private_key, public_key) = signer();
    let canonical = b"_:c14n0 <https://www.w3.org/1999/02/22-rdf-syntax-ns#type> <gx:LegalPerson> .\n";
    let digest = sha256_hex(canonical);

    let proof = create_proof(
        &private_key,
        &digest,
        "did:web:example.com#JWK2020-RSA".to_string(),
        "2026-01-31T12:00:00.000Z".to_string(),
    )
    .expect("Signing should succeed");

    let spliced = splice_payload(&proof.jws, &digest).unwrap();
    let result = verify(&spliced, &public_key).expect("Verification should succeed");

    assert_eq!(result.content, digest);
    assert_eq!(result.protected_header.alg, "PS256");
    assert_eq!(result.protected_header.b64, Some(false));
    assert_eq!(result.protected_header.crit, Some(vec!["b64".to_string()]));
}

#[test]
fn test_tampered_digest_fails() {
    let (private_key, public_key) = signer();
    let digest = sha256_hex(b"canonical");
    let proof = create_proof(&private_key, &digest, "vm".into(), "t".into()).unwrap();

    for index in [0, 31, 63] {
        let tampered = flip_hex_char(&digest, index);
        assert_ne!(tampered, digest);

        let spliced = splice_payload(&proof.jws, &tampered).unwrap();
        assert!(
            verify(&spliced, &public_key).is_none(),
            "Tampered digest at {} must not verify",
            index
        );
    }
}

#[test]
fn test_tampered_signature_fails() {
    let (private_key, public_key) = signer();
    let digest = sha256_hex(b"canonical");
    let proof = create_proof(&private_key, &digest, "vm".into(), "t".into()).unwrap();
    let spliced = splice_payload(&proof.jws, &digest).unwrap();

    for index in [0, 128, 255] {
        let tampered = flip_signature_byte(&spliced, index);
        assert!(
            verify(&tampered, &public_key).is_none(),
            "Tampered signature byte {} must not verify",
            index
        );
    }
}

#[test]
fn test_mismatched_certificate_fails() {
    let (private_key, _) = signer();
    let other = load_certificate_key(OTHER_CERT).unwrap();
    let digest = sha256_hex(b"canonical");
    let proof = create_proof(&private_key, &digest, "vm".into(), "t".into()).unwrap();

    assert!(verify_proof(&proof, &digest, &other).is_none());
}
