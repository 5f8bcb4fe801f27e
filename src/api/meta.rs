use reqwest::Method;

use crate::models::meta::{ApiMeta, ApiVersion};
use crate::{OpenVoxClient, OpenVoxResult};

/// Provides the server's self-description endpoints.
#[derive(Debug)]
pub struct MetaHandler {
    client: OpenVoxClient,
}

impl MetaHandler {
    pub(crate) fn new(client: OpenVoxClient) -> Self {
        Self { client }
    }

    /// Fetches the feature flags and thresholds the server runs with.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use openvox_client::OpenVoxClient;
    /// #
    /// # async fn example(client: &OpenVoxClient) -> Result<(), openvox_client::OpenVoxError> {
    /// let meta = client.meta().meta().await?;
    /// if meta.ca_enabled {
    ///     println!("CA management is available");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn meta(&self) -> OpenVoxResult<ApiMeta> {
        let url = self.client.api_url(&["api", "v1", "meta"])?;
        self.client.request(Method::GET, url, None::<()>).await
    }

    /// Fetches the server's software version.
    pub async fn version(&self) -> OpenVoxResult<ApiVersion> {
        let url = self.client.api_url(&["api", "v1", "version"])?;
        self.client.request(Method::GET, url, None::<()>).await
    }
}
