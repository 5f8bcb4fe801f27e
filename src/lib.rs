//! # openvox-client
//!
//! A Rust client library for the OpenVox View API and the Puppet CA behind it.
//!
//! The OpenVox View server wraps every payload in an envelope: `{"Data": ...}`
//! on success and `{"Error": "..."}` on failure. This crate models both
//! envelopes, the payloads the server reports, and the certificate
//! authority endpoints.
//!
//! ## Features
//!
//! - Typed envelopes and payloads with the server's exact field casing
//! - Certificate listing, signing, revocation and cleaning
//! - A direct Puppet CA client with mutual TLS support
//! - Async API on the Tokio runtime
//!
//! ## Example
//!
//! ```rust,no_run
//! use openvox_client::{CertificateState, OpenVoxClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenVoxClient::builder()
//!         .base_url("https://openvox.example.com")
//!         .build()?;
//!
//!     let version = client.meta().version().await?;
//!     println!("Server version: {version}");
//!
//!     if client.meta().meta().await?.ca_enabled {
//!         let pending = client.ca().status().state(CertificateState::Requested).send().await?;
//!         for certificate in pending {
//!             client.ca().sign(&certificate.name).await?;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
mod client;
mod error;
pub mod models;
pub mod puppetca;

pub use api::ca::{CaHandler, CertificateStatusBuilder};
pub use api::meta::MetaHandler;
#[cfg(feature = "default-client")]
pub use client::{initialize, instance};
pub use client::{OpenVoxClient, OpenVoxClientBuilder};
pub use error::{OpenVoxError, OpenVoxResult, UrlParseError};
pub use models::api_response::{ApiResponse, BaseResponse, ErrorResponse};
pub use models::certificate::{
    CertificateState, CertificateStatus, CertificateStatusQuery, CertificateStatusResponse,
};
pub use models::meta::{ApiMeta, ApiVersion};
pub use puppetca::{PuppetCaClient, PuppetCaConfig, PuppetCaConfigBuilder};
