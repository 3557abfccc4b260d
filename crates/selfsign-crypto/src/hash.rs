// SHA-256 digest engine for self-description proofs

use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the input bytes and returns it as a lowercase hex string.
///
/// The digest of a canonical form is what gets signed, and the same string is
/// later spliced back into the detached JWS for verification, so the output
/// format (64 lowercase hex characters) must never change.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_hash() {
        // SHA-256 of empty string is well-known
        let empty_hash = sha256_hex(b"");
        assert_eq!(
            empty_hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );

        let hello_hash = sha256_hex(b"hello");
        assert_eq!(
            hello_hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );

        // FIPS 180-2 "abc" vector
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_returns_lowercase_hex() {
        let hash = sha256_hex(b"test");
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
        // 256 bits / 4 bits per hex char
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_sha256_is_deterministic() {
        let canonical = "<did:web:example.com> <https://schema.org/name> \"Example\" .\n";
        assert_eq!(
            sha256_hex(canonical.as_bytes()),
            sha256_hex(canonical.as_bytes())
        );
    }

    #[test]
    fn test_sha256_distinguishes_single_byte_change() {
        let a = sha256_hex(b"_:c14n0 <urn:a> \"1\" .\n");
        let b = sha256_hex(b"_:c14n0 <urn:a> \"2\" .\n");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sha256_of_canonical_fixture() {
        let canonical = include_bytes!("../tests/fixtures/canonical_legal_person.nq");
        assert_eq!(
            sha256_hex(canonical),
            "17d5b21dab526cd735072c7334dd4c6102c86cdfc519030e25c5badc5b2adf76"
        );
    }
}
