//! Layer registry built from the feature server's capability documents.
//!
//! One `GetCapabilities` request per service kind, parsed into
//! name/title/keyword entries. A failing or malformed fetch degrades to
//! an empty catalog; the rest of the viewer keeps working.

pub mod capabilities;

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

pub use capabilities::{LayerEntry, parse_wfs_capabilities, parse_wms_capabilities};

/// Keyword that removes a layer from the generic catalog list; such
/// layers are rendered through dedicated, hand-authored descriptors.
pub const HIDDEN_KEYWORD: &str = "hide_wms";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServiceKind {
    Wms,
    Wfs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Http(String),
    Malformed(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Http(msg) => write!(f, "capabilities request failed: {msg}"),
            CatalogError::Malformed(msg) => write!(f, "capability document malformed: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Network seam for capability documents.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait CapabilitiesSource: Send + Sync {
    /// Fetch the raw capability document for one service kind.
    fn fetch_capabilities(&self, kind: ServiceKind) -> BoxFuture<'_, Result<String, CatalogError>>;
}

/// Fetches and parses the catalog for one service kind.
///
/// Callers must tolerate an empty catalog (server offline, malformed
/// document); failures are logged, never propagated.
pub async fn load_catalog(source: &dyn CapabilitiesSource, kind: ServiceKind) -> Vec<LayerEntry> {
    let document = match source.fetch_capabilities(kind).await {
        Ok(doc) => doc,
        Err(err) => {
            warn!("capabilities fetch failed for {kind:?}: {err}");
            return Vec::new();
        }
    };

    let parsed = match kind {
        ServiceKind::Wms => parse_wms_capabilities(&document),
        ServiceKind::Wfs => parse_wfs_capabilities(&document),
    };

    match parsed {
        Ok(entries) => entries,
        Err(err) => {
            warn!("capabilities parse failed for {kind:?}: {err}");
            Vec::new()
        }
    }
}

/// Fetches both catalogs concurrently.
pub async fn load_full_catalog(
    source: &dyn CapabilitiesSource,
) -> (Vec<LayerEntry>, Vec<LayerEntry>) {
    futures_util::future::join(
        load_catalog(source, ServiceKind::Wms),
        load_catalog(source, ServiceKind::Wfs),
    )
    .await
}

/// Drops entries carrying the `hide_wms` sentinel keyword.
pub fn without_hidden(entries: Vec<LayerEntry>) -> Vec<LayerEntry> {
    entries
        .into_iter()
        .filter(|e| !e.keywords.contains(HIDDEN_KEYWORD))
        .collect()
}

/// Legend presentation order.
pub fn sort_by_title(entries: &mut [LayerEntry]) {
    entries.sort_by(|a, b| a.title.cmp(&b.title));
}

#[cfg(test)]
mod tests {
    use super::{
        BoxFuture, CapabilitiesSource, CatalogError, LayerEntry, ServiceKind, load_catalog,
        load_full_catalog, sort_by_title, without_hidden,
    };
    use futures_util::FutureExt;
    use std::collections::BTreeSet;

    struct StaticSource {
        wms: Result<String, CatalogError>,
        wfs: Result<String, CatalogError>,
    }

    impl CapabilitiesSource for StaticSource {
        fn fetch_capabilities(
            &self,
            kind: ServiceKind,
        ) -> BoxFuture<'_, Result<String, CatalogError>> {
            let res = match kind {
                ServiceKind::Wms => self.wms.clone(),
                ServiceKind::Wfs => self.wfs.clone(),
            };
            Box::pin(async move { res })
        }
    }

    fn entry(name: &str, title: &str, keywords: &[&str]) -> LayerEntry {
        LayerEntry {
            name: name.to_string(),
            title: title.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn offline_server_yields_empty_catalog() {
        let source = StaticSource {
            wms: Err(CatalogError::Http("connection refused".to_string())),
            wfs: Err(CatalogError::Http("connection refused".to_string())),
        };
        let (wms, wfs) = futures_util::future::join(
            load_catalog(&source, ServiceKind::Wms),
            load_catalog(&source, ServiceKind::Wfs),
        )
        .now_or_never()
        .expect("static source resolves immediately");
        assert!(wms.is_empty());
        assert!(wfs.is_empty());
    }

    #[test]
    fn malformed_document_yields_empty_catalog() {
        let source = StaticSource {
            wms: Ok("this is not xml <".to_string()),
            wfs: Ok("<WFS_Capabilities><FeatureType>".to_string()),
        };
        let (wms, wfs) = load_full_catalog(&source)
            .now_or_never()
            .expect("static source resolves immediately");
        assert!(wms.is_empty());
        assert!(wfs.is_empty());
    }

    #[test]
    fn hidden_keyword_filters_entries() {
        let entries = vec![
            entry("roads", "Roads", &["features"]),
            entry("bike_lanes", "Bike lanes", &["hide_wms", "features"]),
        ];
        let visible = without_hidden(entries);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "roads");
    }

    #[test]
    fn sorting_is_by_title() {
        let mut entries = vec![entry("b", "Zebra", &[]), entry("a", "Apple", &[])];
        sort_by_title(&mut entries);
        assert_eq!(entries[0].name, "a");
    }
}
