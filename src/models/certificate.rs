use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::OpenVoxError;

/// Lifecycle state of a certificate on the CA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateState {
    /// A signing request is waiting for approval.
    Requested,
    Signed,
    Revoked,
}

impl CertificateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateState::Requested => "requested",
            CertificateState::Signed => "signed",
            CertificateState::Revoked => "revoked",
        }
    }
}

impl fmt::Display for CertificateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateState {
    type Err = OpenVoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(CertificateState::Requested),
            "signed" => Ok(CertificateState::Signed),
            "revoked" => Ok(CertificateState::Revoked),
            other => Err(OpenVoxError::ConfigurationError(format!(
                "Unknown certificate state: {other}"
            ))),
        }
    }
}

/// A certificate as reported by the Puppet CA `certificate_status` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateStatus {
    /// The certname.
    pub name: String,

    pub state: CertificateState,

    /// Default fingerprint (SHA256).
    pub fingerprint: String,

    /// Fingerprints keyed by digest algorithm.
    #[serde(default)]
    pub fingerprints: HashMap<String, String>,

    /// DNS alternative names requested or embedded in the certificate.
    #[serde(default)]
    pub dns_alt_names: Vec<String>,

    #[serde(default)]
    pub subject_alt_names: Vec<String>,

    #[serde(default)]
    pub authorization_extensions: HashMap<String, String>,

    /// Only present for signed or revoked certificates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.state)
    }
}

/// Body of a certificate status query against the OpenVox View API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateStatusQuery {
    /// Restrict results to these states. `None` returns every state.
    #[serde(rename = "States", default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<CertificateState>>,

    /// Substring matched against name and fingerprint, or an exact DNS alt name.
    #[serde(rename = "Filter", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl CertificateStatusQuery {
    /// Returns true if `certificate` passes the filter. Always true without one.
    pub fn matches(&self, certificate: &CertificateStatus) -> bool {
        let Some(filter) = self.filter.as_deref() else {
            return true;
        };

        certificate.name.contains(filter)
            || certificate.fingerprint.contains(filter)
            || certificate.dns_alt_names.iter().any(|name| name == filter)
    }

    /// Keeps only the certificates that pass the filter, preserving order.
    pub fn apply(&self, certificates: Vec<CertificateStatus>) -> Vec<CertificateStatus> {
        certificates.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Payload of a certificate status query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateStatusResponse {
    #[serde(rename = "CertificateStatuses")]
    pub certificate_statuses: Vec<CertificateStatus>,
}
