use log::debug;

use crate::locations::region::{RegionScope, ScopeBound};
use crate::types::location::Location;

/// In-memory directory of candidate locations, ordered by population so
/// that candidate selection always yields the largest places first.
#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    locations: Vec<Location>,
}

impl LocationDirectory {
    /// Builds a directory, sorting by population descending. Locations with
    /// unknown population sort last.
    pub fn new(mut locations: Vec<Location>) -> Self {
        locations.sort_by(|a, b| b.population.unwrap_or(0).cmp(&a.population.unwrap_or(0)));
        Self { locations }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Selects candidates for a resolved scope: filters by bound, applies
    /// the subdivision filter and the population floor, then caps at
    /// `max_candidates` largest places.
    pub fn candidates(
        &self,
        scope: &RegionScope,
        min_population: u64,
        max_candidates: usize,
    ) -> Vec<Location> {
        let selected: Vec<Location> = self
            .locations
            .iter()
            .filter(|location| match &scope.bound {
                ScopeBound::Country { code } => location.country_code == *code,
                ScopeBound::Continent { country_codes } => {
                    country_codes.contains(&location.country_code)
                }
                ScopeBound::Global => true,
            })
            .filter(|location| {
                scope.subdivisions.is_empty()
                    || location
                        .admin_name
                        .as_deref()
                        .is_some_and(|admin| scope.subdivisions.iter().any(|s| s == admin))
            })
            .filter(|location| {
                min_population == 0
                    || location.population.is_some_and(|p| p >= min_population)
            })
            .take(max_candidates)
            .cloned()
            .collect();
        debug!(
            "selected {} of {} locations for scope '{}'",
            selected.len(),
            self.locations.len(),
            scope.display_name
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, code: &str, admin: &str, population: u64) -> Location {
        Location::new(name, "Hungary", code, 47.0, 19.0)
            .with_population(population)
            .with_admin_name(admin)
    }

    fn fixture() -> LocationDirectory {
        LocationDirectory::new(vec![
            place("Miskolc", "HU", "Borsod-Abaúj-Zemplén", 150_000),
            place("Eger", "HU", "Heves", 52_000),
            place("Salgótarján", "HU", "Nógrád", 32_000),
            place("Debrecen", "HU", "Hajdú-Bihar", 200_000),
            place("Pécs", "HU", "Baranya", 140_000),
            place("Vienna", "AT", "Wien", 1_900_000),
        ])
    }

    fn whole_country() -> RegionScope {
        RegionScope {
            key: "hungary".to_string(),
            display_name: "Hungary".to_string(),
            bound: ScopeBound::Country {
                code: "HU".to_string(),
            },
            subdivisions: Vec::new(),
        }
    }

    #[test]
    fn ordering_is_population_descending() {
        let directory = fixture();
        let names: Vec<String> = directory
            .candidates(&whole_country(), 0, 100)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(
            names,
            vec!["Debrecen", "Miskolc", "Pécs", "Eger", "Salgótarján"]
        );
    }

    #[test]
    fn subdivision_filter_narrows_within_country() {
        let directory = fixture();
        let scope = RegionScope {
            key: "eszak-magyarorszag".to_string(),
            display_name: "Észak-Magyarország".to_string(),
            bound: ScopeBound::Country {
                code: "HU".to_string(),
            },
            subdivisions: vec![
                "Borsod-Abaúj-Zemplén".to_string(),
                "Heves".to_string(),
                "Nógrád".to_string(),
            ],
        };
        let names: Vec<String> = directory
            .candidates(&scope, 0, 100)
            .into_iter()
            .map(|l| l.name)
            .collect();
        // Strictly fewer places than the whole country: the filter bites.
        assert_eq!(names, vec!["Miskolc", "Eger", "Salgótarján"]);
        assert!(names.len() < directory.candidates(&whole_country(), 0, 100).len());
    }

    #[test]
    fn population_floor_excludes_small_and_unknown() {
        let mut locations = vec![
            place("Miskolc", "HU", "Borsod-Abaúj-Zemplén", 150_000),
            place("Eger", "HU", "Heves", 52_000),
        ];
        locations.push(Location::new("Nowhere", "Hungary", "HU", 47.0, 19.0));
        let directory = LocationDirectory::new(locations);

        let names: Vec<String> = directory
            .candidates(&whole_country(), 100_000, 100)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Miskolc"]);
    }

    #[test]
    fn cap_keeps_the_largest_places() {
        let directory = fixture();
        let names: Vec<String> = directory
            .candidates(&whole_country(), 0, 2)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Debrecen", "Miskolc"]);
    }

    #[test]
    fn continent_bound_selects_member_countries() {
        let directory = fixture();
        let scope = RegionScope {
            key: "europe".to_string(),
            display_name: "Europe".to_string(),
            bound: ScopeBound::Continent {
                country_codes: vec!["HU".to_string(), "AT".to_string()],
            },
            subdivisions: Vec::new(),
        };
        let candidates = directory.candidates(&scope, 0, 100);
        assert_eq!(candidates.len(), 6);
        assert_eq!(candidates[0].name, "Vienna");
    }
}
