use reqwest::Method;
use serde_json::Value;

use crate::models::certificate::{
    CertificateState, CertificateStatus, CertificateStatusQuery, CertificateStatusResponse,
};
use crate::{OpenVoxClient, OpenVoxError, OpenVoxResult};

/// Provides methods for managing certificates through the OpenVox View
/// certificate authority endpoints.
///
/// The server only exposes these endpoints when `ApiMeta::ca_enabled` is set.
#[derive(Debug)]
pub struct CaHandler {
    client: OpenVoxClient,
}

impl CaHandler {
    pub(crate) fn new(client: OpenVoxClient) -> Self {
        Self { client }
    }

    /// Queries certificate statuses.
    ///
    /// # Returns
    ///
    /// Returns a `CertificateStatusBuilder`, which allows restricting the
    /// states and setting a filter before sending the request.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use openvox_client::{CertificateState, OpenVoxClient};
    /// #
    /// # async fn example(client: &OpenVoxClient) -> Result<(), openvox_client::OpenVoxError> {
    /// let pending = client
    ///     .ca()
    ///     .status()
    ///     .state(CertificateState::Requested)
    ///     .filter("web")
    ///     .send()
    ///     .await?;
    ///
    /// for certificate in pending {
    ///     println!("{certificate}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn status(&self) -> CertificateStatusBuilder {
        CertificateStatusBuilder::new(self.client.clone())
    }

    /// Signs the pending certificate request `name`.
    pub async fn sign(&self, name: &str) -> OpenVoxResult<()> {
        self.certificate_action(Method::POST, name, Some("sign")).await
    }

    /// Revokes the signed certificate `name`.
    pub async fn revoke(&self, name: &str) -> OpenVoxResult<()> {
        self.certificate_action(Method::POST, name, Some("revoke")).await
    }

    /// Removes certificate `name` from the CA, revoking it first if signed.
    pub async fn clean(&self, name: &str) -> OpenVoxResult<()> {
        self.certificate_action(Method::DELETE, name, None).await
    }

    async fn certificate_action(
        &self,
        method: Method,
        name: &str,
        action: Option<&str>,
    ) -> OpenVoxResult<()> {
        if name.trim().is_empty() {
            return Err(OpenVoxError::InvalidEndpoint(
                "Certificate name must not be empty".to_string(),
            ));
        }
        // Dot segments are dropped by URL normalization and would hit another route.
        if name == "." || name == ".." {
            return Err(OpenVoxError::InvalidEndpoint(format!(
                "Invalid certificate name: {name}"
            )));
        }

        let mut segments = vec!["api", "v1", "ca", "status", name];
        segments.extend(action);
        let url = self.client.api_url(&segments)?;

        // The server answers with `{"Data": null}`.
        let _: Value = self.client.request(method, url, None::<()>).await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CertificateStatusBuilder {
    client: OpenVoxClient,
    query: CertificateStatusQuery,
}

impl CertificateStatusBuilder {
    pub(crate) fn new(client: OpenVoxClient) -> Self {
        Self {
            client,
            query: CertificateStatusQuery::default(),
        }
    }

    /// Adds `state` to the states to return. Without any, all states are returned.
    pub fn state(mut self, state: CertificateState) -> Self {
        self.query.states.get_or_insert_with(Vec::new).push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = CertificateState>) -> Self {
        self.query.states.get_or_insert_with(Vec::new).extend(states);
        self
    }

    /// Only return certificates whose name or fingerprint contains `filter`,
    /// or that carry it as a DNS alt name.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.query.filter = Some(filter.into());
        self
    }

    pub async fn send(self) -> OpenVoxResult<Vec<CertificateStatus>> {
        let url = self.client.api_url(&["api", "v1", "ca", "status"])?;
        let response: CertificateStatusResponse =
            self.client.request(Method::POST, url, Some(self.query)).await?;
        Ok(response.certificate_statuses)
    }
}
