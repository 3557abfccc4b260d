// selfsign CLI - operator tooling for self-description proofs

mod files;

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;

/// selfsign - Detached PS256 proofs for self-descriptions
#[derive(Parser)]
#[command(name = "selfsign")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SHA-256 hex digest of a canonical form
    Digest {
        /// Path to the canonical (normalized) document
        path: PathBuf,
    },
    /// Sign the digest of a canonical form and emit a proof
    Sign {
        /// Path to the canonical (normalized) document
        path: PathBuf,

        /// PKCS#8 PEM file holding the RSA private key
        #[arg(short, long)]
        key: PathBuf,

        /// Verification method URI recorded in the proof
        #[arg(long, value_name = "URI")]
        verification_method: String,

        /// Write the proof to <file>.proof.json instead of stdout
        #[arg(short, long)]
        write: bool,
    },
    /// Verify a proof against a canonical form
    Verify {
        /// Path to the canonical (normalized) document
        path: PathBuf,

        /// X.509 certificate or SPKI public key PEM
        #[arg(short, long)]
        cert: PathBuf,

        /// Proof JSON (defaults to <file>.proof.json)
        #[arg(short, long)]
        proof: Option<PathBuf>,
    },
    /// Submit a self-description to a running signing server
    Submit {
        /// Path to the self-description JSON
        path: PathBuf,

        /// Base URL of the server
        #[arg(short, long, default_value = "http://localhost:3000")]
        server: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Digest { path } => handle_digest(&path),
        Commands::Sign {
            path,
            key,
            verification_method,
            write,
        } => handle_sign(&path, &key, verification_method, write),
        Commands::Verify { path, cert, proof } => handle_verify(&path, &cert, proof.as_deref()),
        Commands::Submit { path, server } => handle_submit(&path, &server),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn handle_digest(path: &Path) -> anyhow::Result<()> {
    let bytes = files::read_bytes(path)?;
    println!("{}", selfsign_crypto::sha256_hex(&bytes));
    Ok(())
}

fn handle_sign(
    path: &Path,
    key_path: &Path,
    verification_method: String,
    write: bool,
) -> anyhow::Result<()> {
    let signing_key = selfsign_crypto::load_signing_key(&files::read_pem(key_path)?)?;

    let digest = selfsign_crypto::sha256_hex(&files::read_bytes(path)?);
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let proof = selfsign_crypto::create_proof(&signing_key, &digest, verification_method, created)?;

    if write {
        let output_path = files::proof_path(path);
        files::write_json(&output_path, &proof)?;
        println!("Proof written to: {}", output_path.display());
        println!("Digest: {}", digest);
    } else {
        println!("{}", serde_json::to_string_pretty(&proof)?);
    }

    Ok(())
}

fn handle_verify(path: &Path, cert_path: &Path, proof_path: Option<&Path>) -> anyhow::Result<()> {
    let proof_file = match proof_path {
        Some(p) => p.to_path_buf(),
        None => files::proof_path(path),
    };

    let proof = files::read_proof(&proof_file)?;
    let public_key = selfsign_crypto::load_public_key(&files::read_pem(cert_path)?)?;
    let digest = selfsign_crypto::sha256_hex(&files::read_bytes(path)?);

    match selfsign_crypto::check_proof(&proof, &digest, &public_key) {
        Ok(result) => {
            println!("{} {}", "✓".green().bold(), "Proof verified".green());
            println!();
            println!("  Method:  {}", proof.verification_method);
            println!("  Created: {}", proof.created);
            println!("  Digest:  {}", result.content);
            println!("  Alg:     {}", result.protected_header.alg);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), "Proof verification failed".red());
            eprintln!();
            eprintln!("  Digest: {}", digest);
            eprintln!("  Error:  {}", e);
            Err(e)
        }
    }
}

fn handle_submit(path: &Path, server: &str) -> anyhow::Result<()> {
    let document = files::read_json(path)?;
    let url = format!("{}/sign", server.trim_end_matches('/'));

    let response = ureq::post(&url).send_json(serde_json::json!({ "selfDescription": document }));

    match response {
        Ok(resp) => {
            let body: serde_json::Value = resp.into_json()?;
            let conforms = body["result"]["conforms"].as_bool().unwrap_or(false);
            if conforms {
                eprintln!("{} {}", "✓".green().bold(), "Compliance authority: conforms".green());
            } else {
                eprintln!("{} {}", "!".yellow().bold(), "Compliance authority: does not conform".yellow());
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            eprintln!("{} {}", "✗".red().bold(), format!("Server returned {}", code).red());
            eprintln!();
            eprintln!("  {}", body);
            Err(anyhow::anyhow!("Submission failed with status {}", code))
        }
        Err(e) => Err(anyhow::anyhow!("Failed to reach '{}': {}", url, e)),
    }
}
