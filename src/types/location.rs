/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A populated place the analytics layer can query weather for.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// ISO 3166-1 alpha-2 code, upper case.
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: Option<u64>,
    /// First-level administrative subdivision (county, state, ...).
    pub admin_name: Option<String>,
    /// Directory-supplied confidence in the coordinates, 0.0 to 1.0.
    pub quality_score: Option<f64>,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        country_code: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            country_code: country_code.into(),
            latitude,
            longitude,
            population: None,
            admin_name: None,
            quality_score: None,
        }
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_admin_name(mut self, admin_name: impl Into<String>) -> Self {
        self.admin_name = Some(admin_name.into());
        self
    }

    pub fn coords(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }
}
