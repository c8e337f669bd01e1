use foundation::LatLon;

/// Zone category of a point of interest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Busy,
    Calm,
    Pollution,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Busy => "busy",
            Category::Calm => "calm",
            Category::Pollution => "pollution",
        }
    }
}

/// Fixture zone shown as a marker on the map. Immutable for the session.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointOfInterest {
    pub position: LatLon,
    pub category: Category,
    pub label: &'static str,
    pub aqi: u32,
    pub noise_db: u32,
}

pub static FIXTURES: [PointOfInterest; 4] = [
    PointOfInterest {
        position: LatLon::new(18.5204, 73.8567),
        category: Category::Busy,
        label: "FC Road - High Traffic",
        aqi: 120,
        noise_db: 75,
    },
    PointOfInterest {
        position: LatLon::new(18.5314, 73.8446),
        category: Category::Calm,
        label: "Koregaon Park - Calm Zone",
        aqi: 65,
        noise_db: 45,
    },
    PointOfInterest {
        position: LatLon::new(18.5074, 73.8077),
        category: Category::Pollution,
        label: "Industrial Area - High Pollution",
        aqi: 150,
        noise_db: 80,
    },
    PointOfInterest {
        position: LatLon::new(18.5362, 73.897),
        category: Category::Calm,
        label: "Viman Nagar - Low Traffic",
        aqi: 70,
        noise_db: 50,
    },
];

pub fn fixtures() -> &'static [PointOfInterest] {
    &FIXTURES
}
