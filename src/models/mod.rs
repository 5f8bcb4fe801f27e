//! Data models for the OpenVox View API.
//!
//! This module contains the JSON envelopes and payloads exchanged with the
//! server, and the certificate model shared with the Puppet CA.

pub mod api_response;
pub mod certificate;
pub mod meta;

pub use api_response::ApiResponse;
