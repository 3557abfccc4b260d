// selfsign-crypto - Proof construction and verification for self-descriptions

pub mod hash;
pub mod jws;
pub mod keys;
pub mod sign;
pub mod types;
pub mod verify;

pub use hash::sha256_hex;
pub use jws::{sign_detached, splice_payload, verify_compact};
pub use keys::{is_key_pair, load_certificate_key, load_public_key, load_signing_key};
pub use sign::create_proof;
pub use types::{Proof, ProtectedHeader, VerificationResult};
pub use verify::{check_proof, verify_proof};

pub use rsa::{RsaPrivateKey, RsaPublicKey};
