//! Endpoint handlers of the OpenVox View API.

pub mod ca;
pub mod meta;
