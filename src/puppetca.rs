//! Direct client for the Puppet/OpenVox CA `puppet-ca/v1` HTTP API.
//!
//! This is the backend the OpenVox View server proxies its certificate
//! endpoints to. Most setups need mutual TLS: configure the CA bundle and the
//! client certificate and key the CA trusts.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use reqwest::{Certificate, Client as ReqwestClient, Identity, Method, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::models::certificate::{CertificateState, CertificateStatus, CertificateStatusQuery};
use crate::{OpenVoxError, OpenVoxResult};

/// Connection settings for the Puppet CA.
#[derive(Debug, Clone)]
pub struct PuppetCaConfig {
    address: Url,
    tls_ca: Option<PathBuf>,
    tls_cert: Option<PathBuf>,
    tls_key: Option<PathBuf>,
    tls_ignore: bool,
    timeout: Duration,
}

impl PuppetCaConfig {
    pub fn builder() -> PuppetCaConfigBuilder {
        PuppetCaConfigBuilder::default()
    }

    pub fn address(&self) -> &Url {
        &self.address
    }
}

/// Builder for [`PuppetCaConfig`].
#[derive(Debug, Default)]
pub struct PuppetCaConfigBuilder {
    address: Option<String>,
    tls_ca: Option<PathBuf>,
    tls_cert: Option<PathBuf>,
    tls_key: Option<PathBuf>,
    tls_ignore: Option<bool>,
    timeout: Option<Duration>,
}

impl PuppetCaConfigBuilder {
    /// Sets the CA address, e.g. `https://puppet:8140`.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// PEM bundle used to verify the CA's server certificate.
    pub fn tls_ca(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_ca = Some(path.into());
        self
    }

    /// PEM client certificate presented to the CA.
    pub fn tls_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_cert = Some(path.into());
        self
    }

    /// PEM private key matching the client certificate.
    pub fn tls_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_key = Some(path.into());
        self
    }

    /// Skip verification of the CA's server certificate.
    pub fn tls_ignore(mut self, ignore: bool) -> Self {
        self.tls_ignore = Some(ignore);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fills unset values from the `PUPPETCA_ADDRESS`, `PUPPETCA_TLS_CA`,
    /// `PUPPETCA_TLS_CERT`, `PUPPETCA_TLS_KEY` and `PUPPETCA_TLS_IGNORE`
    /// environment variables.
    pub fn from_env(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if self.address.is_none() {
            self.address = var("PUPPETCA_ADDRESS");
        }
        if self.tls_ca.is_none() {
            self.tls_ca = var("PUPPETCA_TLS_CA").map(PathBuf::from);
        }
        if self.tls_cert.is_none() {
            self.tls_cert = var("PUPPETCA_TLS_CERT").map(PathBuf::from);
        }
        if self.tls_key.is_none() {
            self.tls_key = var("PUPPETCA_TLS_KEY").map(PathBuf::from);
        }
        if self.tls_ignore.is_none() {
            self.tls_ignore = var("PUPPETCA_TLS_IGNORE").map(|ignore| {
                matches!(ignore.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            });
        }
        self
    }

    pub fn build(self) -> OpenVoxResult<PuppetCaConfig> {
        let address = self
            .address
            .ok_or_else(|| OpenVoxError::ConfigurationError("Puppet CA address is required".into()))
            .and_then(|url_str| {
                Url::parse(&url_str).map_err(|e| {
                    OpenVoxError::ConfigurationError(format!("Invalid Puppet CA address: {e}"))
                })
            })?;

        if address.cannot_be_a_base() {
            return Err(OpenVoxError::ConfigurationError(format!(
                "Invalid Puppet CA address: {address} cannot carry a path"
            )));
        }

        if self.tls_cert.is_some() != self.tls_key.is_some() {
            return Err(OpenVoxError::ConfigurationError(
                "TLS certificate and key must be configured together".into(),
            ));
        }

        Ok(PuppetCaConfig {
            address,
            tls_ca: self.tls_ca,
            tls_cert: self.tls_cert,
            tls_key: self.tls_key,
            tls_ignore: self.tls_ignore.unwrap_or(false),
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
        })
    }
}

#[derive(Serialize)]
struct DesiredStateRequest {
    desired_state: CertificateState,
}

#[derive(Serialize)]
struct CleanRequest<'a> {
    certnames: [&'a str; 1],
}

/// Client for the Puppet CA certificate status API.
#[derive(Debug, Clone)]
pub struct PuppetCaClient {
    address: Url,
    http_client: ReqwestClient,
}

impl PuppetCaClient {
    /// Creates a client, loading the configured TLS material from disk.
    pub async fn new(config: PuppetCaConfig) -> OpenVoxResult<Self> {
        let mut builder = ReqwestClient::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.tls_ignore);

        if let Some(path) = &config.tls_ca {
            let pem = tokio::fs::read(path).await?;
            let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| {
                OpenVoxError::ConfigurationError(format!(
                    "Invalid CA bundle {}: {e}",
                    path.display()
                ))
            })?;
            for certificate in certificates {
                builder = builder.add_root_certificate(certificate);
            }
        }

        if let (Some(cert_path), Some(key_path)) = (&config.tls_cert, &config.tls_key) {
            let mut pem = tokio::fs::read(cert_path).await?;
            pem.push(b'\n');
            pem.extend(tokio::fs::read(key_path).await?);
            let identity = Identity::from_pem(&pem).map_err(|e| {
                OpenVoxError::ConfigurationError(format!("Invalid client certificate or key: {e}"))
            })?;
            builder = builder.identity(identity);
        }

        let http_client = builder.build().map_err(|e| {
            OpenVoxError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self::with_http_client(config.address, http_client))
    }

    /// Creates a client around an existing reqwest client.
    pub fn with_http_client(address: Url, http_client: ReqwestClient) -> Self {
        Self {
            address,
            http_client,
        }
    }

    /// Lists all certificates, optionally only those in `state`.
    pub async fn get_certificates(
        &self,
        state: Option<CertificateState>,
    ) -> OpenVoxResult<Vec<CertificateStatus>> {
        let query = state.map(|s| ("state", s.as_str()));
        let response = self
            .call(Method::GET, &["certificate_statuses", "all"], query, None::<()>)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => Err(unexpected_status("listing certificates", status)),
        }
    }

    /// Fetches one certificate. Returns `None` if the CA does not know `name`.
    pub async fn get_certificate(&self, name: &str) -> OpenVoxResult<Option<CertificateStatus>> {
        let response = self
            .call(Method::GET, &["certificate_status", name], None, None::<()>)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(unexpected_status("fetching certificate", status)),
        }
    }

    pub async fn sign_certificate(&self, name: &str) -> OpenVoxResult<()> {
        self.set_desired_state(name, CertificateState::Signed).await
    }

    pub async fn revoke_certificate(&self, name: &str) -> OpenVoxResult<()> {
        self.set_desired_state(name, CertificateState::Revoked).await
    }

    /// Removes `name` from the CA.
    ///
    /// Signed certificates go through the `clean` endpoint, which revokes and
    /// deletes in one step. Requested and revoked ones are deleted directly.
    pub async fn clean_certificate(&self, name: &str) -> OpenVoxResult<()> {
        let status = self
            .get_certificate(name)
            .await?
            .ok_or_else(|| OpenVoxError::CertificateNotFound(name.to_string()))?;

        let response = match status.state {
            CertificateState::Signed => {
                let body = CleanRequest { certnames: [name] };
                self.call(Method::PUT, &["clean"], None, Some(body)).await?
            }
            CertificateState::Requested | CertificateState::Revoked => {
                self.call(Method::DELETE, &["certificate_status", name], None, None::<()>)
                    .await?
            }
        };

        expect_success("cleaning certificate", response.status())
    }

    /// Runs a status query: one fetch per requested state, in order, or a
    /// single unrestricted fetch, followed by the query's filter.
    pub async fn query_statuses(
        &self,
        query: &CertificateStatusQuery,
    ) -> OpenVoxResult<Vec<CertificateStatus>> {
        let certificates = match &query.states {
            Some(states) => {
                let mut certificates = Vec::new();
                for state in states {
                    certificates.extend(self.get_certificates(Some(*state)).await?);
                }
                certificates
            }
            None => self.get_certificates(None).await?,
        };

        Ok(query.apply(certificates))
    }

    async fn set_desired_state(&self, name: &str, state: CertificateState) -> OpenVoxResult<()> {
        let body = DesiredStateRequest {
            desired_state: state,
        };
        let response = self
            .call(Method::PUT, &["certificate_status", name], None, Some(body))
            .await?;

        expect_success("changing certificate state", response.status())
    }

    async fn call<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<(&str, &str)>,
        body: Option<B>,
    ) -> OpenVoxResult<Response> {
        if let Some(bad) = segments.iter().find(|s| s.is_empty() || **s == "." || **s == "..") {
            return Err(OpenVoxError::InvalidEndpoint(format!(
                "Invalid path segment: {bad:?}"
            )));
        }

        let mut url = self.address.clone();
        url.path_segments_mut()
            .map_err(|_| OpenVoxError::InvalidEndpoint(self.address.to_string()))?
            .pop_if_empty()
            .extend(["puppet-ca", "v1"])
            .extend(segments);
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }

        debug!("HTTP {} {}", method, url);

        let mut request = self.http_client.request(method, url);
        if let Some(data) = body {
            request = request.json(&data);
        }

        Ok(request.send().await?)
    }
}

fn expect_success(action: &str, status: StatusCode) -> OpenVoxResult<()> {
    match status {
        StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
        status => Err(unexpected_status(action, status)),
    }
}

fn unexpected_status(action: &str, status: StatusCode) -> OpenVoxError {
    warn!("Unexpected status code while {}: {}", action, status);
    OpenVoxError::UnexpectedStatus(status)
}
