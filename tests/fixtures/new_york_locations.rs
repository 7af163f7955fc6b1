//! Real New York City locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. These are real, routable
//! locations that work with OSRM New York data.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Depots (technician start locations)
// ============================================================================

pub const DEPOTS: &[Location] = &[
    Location::new("Midtown Depot", 40.7580, -73.9855),
    Location::new("Downtown Depot", 40.7074, -74.0113),
    Location::new("Brooklyn Depot", 40.6782, -73.9442),
];

// ============================================================================
// Manhattan Service Sites
// ============================================================================

pub const MANHATTAN_SITES: &[Location] = &[
    Location::new("Empire State Building", 40.7484, -73.9857),
    Location::new("Grand Central Terminal", 40.7527, -73.9772),
    Location::new("Madison Square Garden", 40.7505, -73.9934),
    Location::new("Chelsea Market", 40.7420, -74.0048),
    Location::new("Lincoln Center", 40.7725, -73.9835),
    Location::new("Columbia University", 40.8075, -73.9626),
    Location::new("Apollo Theater", 40.8100, -73.9500),
    Location::new("One World Trade Center", 40.7127, -74.0134),
];

// ============================================================================
// Brooklyn Service Sites
// ============================================================================

pub const BROOKLYN_SITES: &[Location] = &[
    Location::new("Barclays Center", 40.6826, -73.9754),
    Location::new("Brooklyn Museum", 40.6712, -73.9636),
    Location::new("Coney Island Boardwalk", 40.5725, -73.9796),
];
