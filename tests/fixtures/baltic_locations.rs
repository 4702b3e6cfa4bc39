//! City-centre coordinates around the Baltic freight corridor.

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
// Lithuania
// ============================================================================

pub const VILNIUS: Location = Location::new("Vilnius", 54.6872, 25.2797);
pub const KAUNAS: Location = Location::new("Kaunas", 54.8985, 23.9036);
pub const KLAIPEDA: Location = Location::new("Klaipeda", 55.7033, 21.1443);
pub const SIAULIAI: Location = Location::new("Siauliai", 55.9349, 23.3137);
pub const PANEVEZYS: Location = Location::new("Panevezys", 55.7348, 24.3575);

// ============================================================================
// Latvia / Estonia
// ============================================================================

pub const RIGA: Location = Location::new("Riga", 56.9496, 24.1052);
pub const DAUGAVPILS: Location = Location::new("Daugavpils", 55.8747, 26.5362);
pub const LIEPAJA: Location = Location::new("Liepaja", 56.5047, 21.0108);
pub const TALLINN: Location = Location::new("Tallinn", 59.4370, 24.7536);
pub const TARTU: Location = Location::new("Tartu", 58.3776, 26.7290);

// ============================================================================
// Poland
// ============================================================================

pub const WARSAW: Location = Location::new("Warsaw", 52.2297, 21.0122);
pub const BIALYSTOK: Location = Location::new("Bialystok", 53.1325, 23.1688);

pub const ALL: &[Location] = &[
    VILNIUS, KAUNAS, KLAIPEDA, SIAULIAI, PANEVEZYS, RIGA, DAUGAVPILS, LIEPAJA, TALLINN, TARTU,
    WARSAW, BIALYSTOK,
];
