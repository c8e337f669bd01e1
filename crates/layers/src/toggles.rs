/// Expert-legend checkbox, keyed by its `data-layer` attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ToggleKey {
    TrafficFlow,
    TrafficIncidents,
    PoiClusters,
}

impl ToggleKey {
    pub const ALL: [ToggleKey; 3] = [
        ToggleKey::TrafficFlow,
        ToggleKey::TrafficIncidents,
        ToggleKey::PoiClusters,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "traffic-flow" => Some(ToggleKey::TrafficFlow),
            "traffic-incidents" => Some(ToggleKey::TrafficIncidents),
            "poi-clusters" => Some(ToggleKey::PoiClusters),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToggleKey::TrafficFlow => "traffic-flow",
            ToggleKey::TrafficIncidents => "traffic-incidents",
            ToggleKey::PoiClusters => "poi-clusters",
        }
    }
}

/// Checkbox state read by reconciliation. The controller never writes it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerToggles {
    pub flow: bool,
    pub incidents: bool,
    pub poi_clusters: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            flow: true,
            incidents: false,
            poi_clusters: true,
        }
    }
}

impl LayerToggles {
    pub fn get(&self, key: ToggleKey) -> bool {
        match key {
            ToggleKey::TrafficFlow => self.flow,
            ToggleKey::TrafficIncidents => self.incidents,
            ToggleKey::PoiClusters => self.poi_clusters,
        }
    }

    pub fn set(&mut self, key: ToggleKey, checked: bool) {
        match key {
            ToggleKey::TrafficFlow => self.flow = checked,
            ToggleKey::TrafficIncidents => self.incidents = checked,
            ToggleKey::PoiClusters => self.poi_clusters = checked,
        }
    }
}
