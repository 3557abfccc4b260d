//! selfsign server - signs self-descriptions and checks them with a compliance authority
//!
//! The pipeline canonicalizes a self-description through the normalizer,
//! signs its SHA-256 digest with a detached PS256 JWS, checks that signature
//! locally and then round-trips the signed document through the compliance
//! authority's signing and verification endpoints.

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod routes;

pub use config::{ConfigError, SignerConfig};
pub use error::AppError;
pub use pipeline::{Pipeline, PipelineError, PipelineStage};
pub use routes::create_router;
