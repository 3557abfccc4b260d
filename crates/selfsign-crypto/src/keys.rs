// Key material loading for self-description proofs
//
// Keys are supplied out-of-band (PEM text from configuration); nothing here
// generates or rotates keys.

use anyhow::{anyhow, Result};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use x509_cert::der::{DecodePem, Encode};
use x509_cert::Certificate;

/// Smallest RSA modulus accepted for PS256.
pub const MIN_MODULUS_BITS: usize = 2048;

/// Normalizes PEM text that arrived through an environment variable.
///
/// Literal `\n` escapes become real newlines and surrounding whitespace is
/// trimmed, leaving exactly one trailing newline.
pub fn normalize_pem(pem: &str) -> String {
    let unescaped = pem.replace("\\n", "\n");
    format!("{}\n", unescaped.trim())
}

/// Parses a PKCS#8 PEM-encoded RSA private key for PS256 signing.
///
/// Fails if the PEM is not PKCS#8, if the key is not RSA (for example an EC
/// key), or if the modulus is shorter than [`MIN_MODULUS_BITS`].
pub fn load_signing_key(pkcs8_pem: &str) -> Result<RsaPrivateKey> {
    let pem = normalize_pem(pkcs8_pem);
    let key = RsaPrivateKey::from_pkcs8_pem(&pem)
        .map_err(|e| anyhow!("Invalid PKCS#8 RSA private key: {}", e))?;

    check_modulus(key.size() * 8)?;
    Ok(key)
}

/// Extracts the RSA public key from a PEM-encoded X.509 certificate.
pub fn load_certificate_key(certificate_pem: &str) -> Result<RsaPublicKey> {
    let pem = normalize_pem(certificate_pem);
    let certificate = Certificate::from_pem(pem.as_bytes())
        .map_err(|e| anyhow!("Invalid X.509 certificate: {}", e))?;

    let spki_der = certificate
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| anyhow!("Failed to encode certificate public key: {}", e))?;

    let key = RsaPublicKey::from_public_key_der(&spki_der)
        .map_err(|e| anyhow!("Certificate does not carry an RSA public key: {}", e))?;

    check_modulus(key.size() * 8)?;
    Ok(key)
}

/// Loads a verification key from either a certificate or an SPKI `PUBLIC KEY` PEM.
pub fn load_public_key(pem: &str) -> Result<RsaPublicKey> {
    if pem.contains("BEGIN CERTIFICATE") {
        return load_certificate_key(pem);
    }

    let key = RsaPublicKey::from_public_key_pem(&normalize_pem(pem))
        .map_err(|e| anyhow!("Invalid RSA public key: {}", e))?;
    check_modulus(key.size() * 8)?;
    Ok(key)
}

/// Returns true if `public_key` is the public half of `private_key`.
pub fn is_key_pair(private_key: &RsaPrivateKey, public_key: &RsaPublicKey) -> bool {
    RsaPublicKey::from(private_key) == *public_key
}

fn check_modulus(bits: usize) -> Result<()> {
    if bits < MIN_MODULUS_BITS {
        return Err(anyhow!(
            "PS256 requires an RSA modulus of at least {} bits (got {})",
            MIN_MODULUS_BITS,
            bits
        ));
    }
    Ok(())
}
