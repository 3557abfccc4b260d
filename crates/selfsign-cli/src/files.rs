// File helpers for the selfsign CLI
//
// Reads key material, proofs and documents with path context in errors, and
// writes JSON outputs next to their inputs.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use selfsign_crypto::Proof;
use serde::Serialize;
use serde_json::Value;

/// Reads a file's raw bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))
}

/// Reads a PEM file as text.
pub fn read_pem(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read PEM file '{}': {}", path.display(), e))
}

/// Reads a proof JSON file.
///
/// Accepts either a bare proof or a signed document carrying it under `proof`.
pub fn read_proof(path: &Path) -> Result<Proof> {
    let value = read_json(path)?;
    let proof = match value.get("proof") {
        Some(inner) => inner.clone(),
        None => value,
    };
    serde_json::from_value(proof)
        .map_err(|e| anyhow!("Failed to parse proof in '{}': {}", path.display(), e))
}

/// Reads a JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow!("Failed to parse JSON in '{}': {}", path.display(), e))
}

/// Default output path for a proof over `input`: `<input>.proof.json`.
pub fn proof_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".proof.json");
    PathBuf::from(name)
}

/// Writes `value` as pretty JSON, world-readable on unix.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, &json)?;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, &json)?;
    }

    Ok(())
}
