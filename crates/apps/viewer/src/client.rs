//! HTTP client for the feature server.
//!
//! One `reqwest` client serves capability fetches, feature-info probes
//! and trajectory queries. Error mapping is uniform: transport failures
//! and non-success statuses surface as HTTP errors, undecodable bodies
//! as malformed ones.

use catalog::{CapabilitiesSource, CatalogError, ServiceKind};
use picking::{FeatureInfoProber, ProbeError};
use protocol::{Feature, FeatureCollection, ServerEndpoint};

pub struct GeoClient {
    http: reqwest::Client,
    endpoint: ServerEndpoint,
}

impl GeoClient {
    pub fn new(endpoint: ServerEndpoint) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Fetches a WFS `GetFeature` URL and parses the GeoJSON response.
    pub async fn fetch_features(&self, url: &str) -> Result<FeatureCollection, ProbeError> {
        let body = self
            .get_text(url)
            .await
            .map_err(|e| ProbeError::Http(e.to_string()))?;
        FeatureCollection::parse(&body).map_err(|e| ProbeError::Malformed(e.to_string()))
    }
}

impl CapabilitiesSource for GeoClient {
    fn fetch_capabilities(
        &self,
        kind: ServiceKind,
    ) -> catalog::BoxFuture<'_, Result<String, CatalogError>> {
        let url = match kind {
            ServiceKind::Wms => self.endpoint.wms_capabilities_url(),
            ServiceKind::Wfs => self.endpoint.wfs_capabilities_url(),
        };
        Box::pin(async move {
            self.get_text(&url)
                .await
                .map_err(|e| CatalogError::Http(e.to_string()))
        })
    }
}

impl FeatureInfoProber for GeoClient {
    fn fetch_feature_info(
        &self,
        url: String,
    ) -> picking::BoxFuture<'_, Result<Option<Feature>, ProbeError>> {
        Box::pin(async move {
            let collection = self.fetch_features(&url).await?;
            Ok(collection.into_first())
        })
    }
}
