use std::collections::BTreeSet;

use catalog::LayerEntry;
use protocol::QueryParams;

use crate::style::StyleRule;

/// How a layer is materialized by the rendering backend. Decided once
/// at creation time; update and hit-test logic branch on this tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerKind {
    /// WMS tile layer; data arrives as rendered images.
    Tile,
    /// WFS vector layer; features arrive as GeoJSON.
    Vector,
    /// WFS vector layer rendered as a heat map.
    Heatmap,
}

/// Everything the viewer knows about one layer.
///
/// Identity is `name`. Descriptors come from capability-document parsing
/// or from literal definitions; `params` is mutated in place on every
/// filter event, and every mutation forces a full data re-fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescriptor {
    pub name: String,
    pub title: String,
    pub keywords: BTreeSet<String>,
    pub kind: LayerKind,
    pub params: QueryParams,
    pub style: Option<StyleRule>,
}

impl LayerDescriptor {
    pub fn new(kind: LayerKind, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            keywords: BTreeSet::new(),
            kind,
            params: QueryParams::new(),
            style: None,
        }
    }

    pub fn tile(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(LayerKind::Tile, name, title)
    }

    pub fn vector(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(LayerKind::Vector, name, title)
    }

    pub fn heatmap(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(LayerKind::Heatmap, name, title)
    }

    /// Descriptor for a layer advertised by the catalog.
    pub fn from_entry(entry: LayerEntry, kind: LayerKind) -> Self {
        Self {
            name: entry.name,
            title: entry.title,
            keywords: entry.keywords,
            kind,
            params: QueryParams::new(),
            style: None,
        }
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_style(mut self, style: StyleRule) -> Self {
        self.style = Some(style);
        self
    }
}
