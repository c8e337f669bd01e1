use crate::layer::{Layer, LayerId};

/// The two optional traffic overlays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKind {
    Flow,
    Incidents,
}

impl OverlayKind {
    /// Removal and re-add order within a reconciliation pass.
    pub const ALL: [OverlayKind; 2] = [OverlayKind::Flow, OverlayKind::Incidents];

    pub fn layer_id(self) -> LayerId {
        match self {
            OverlayKind::Flow => LayerId("traffic-flow"),
            OverlayKind::Incidents => LayerId("traffic-incidents"),
        }
    }
}

/// Wrapper around an SDK overlay (traffic flow or incidents tiles).
///
/// The rendering layer and its data source share [`OverlayLayer::id`]; both
/// must be gone before the overlay is added again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayer {
    kind: OverlayKind,
    api_key: String,
}

impl OverlayLayer {
    pub fn new(kind: OverlayKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Layer for OverlayLayer {
    fn id(&self) -> LayerId {
        self.kind.layer_id()
    }
}
