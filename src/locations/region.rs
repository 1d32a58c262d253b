use log::debug;

use crate::locations::error::RegionResolutionError;

/// Coarse geographic bound a region token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeBound {
    /// One country, identified by its ISO 3166-1 alpha-2 code.
    Country { code: String },
    /// A set of countries making up a continent.
    Continent { country_codes: Vec<String> },
    /// No geographic restriction.
    Global,
}

/// A resolved region: its coarse bound plus an optional subdivision filter.
/// An empty `subdivisions` list means the whole bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionScope {
    pub key: String,
    pub display_name: String,
    pub bound: ScopeBound,
    /// Administrative subdivision names candidates must belong to.
    pub subdivisions: Vec<String>,
}

#[derive(Debug, Clone)]
struct RegionEntry {
    key: String,
    display_name: String,
    aliases: Vec<String>,
    bound: ScopeBound,
    subdivisions: Vec<String>,
}

impl RegionEntry {
    fn scope(&self) -> RegionScope {
        RegionScope {
            key: self.key.clone(),
            display_name: self.display_name.clone(),
            bound: self.bound.clone(),
            subdivisions: self.subdivisions.clone(),
        }
    }

    /// A named group of subdivisions inside a country.
    fn is_sub_region(&self) -> bool {
        self.subdivisions.len() > 1
    }

    /// A single subdivision addressed by its own name.
    fn is_subdivision(&self) -> bool {
        self.subdivisions.len() == 1
    }
}

/// Hungarian statistical regions and the counties they group, per the
/// national statistical office's NUTS-2 layout.
const HUNGARIAN_REGIONS: [(&str, &str, &[&str]); 7] = [
    (
        "kozep-magyarorszag",
        "Közép-Magyarország",
        &["Budapest", "Pest"],
    ),
    (
        "kozep-dunantul",
        "Közép-Dunántúl",
        &["Fejér", "Komárom-Esztergom", "Veszprém"],
    ),
    (
        "nyugat-dunantul",
        "Nyugat-Dunántúl",
        &["Győr-Moson-Sopron", "Vas", "Zala"],
    ),
    (
        "del-dunantul",
        "Dél-Dunántúl",
        &["Baranya", "Somogy", "Tolna"],
    ),
    (
        "eszak-magyarorszag",
        "Észak-Magyarország",
        &["Borsod-Abaúj-Zemplén", "Heves", "Nógrád"],
    ),
    (
        "eszak-alfold",
        "Észak-Alföld",
        &["Hajdú-Bihar", "Jász-Nagykun-Szolnok", "Szabolcs-Szatmár-Bereg"],
    ),
    (
        "del-alfold",
        "Dél-Alföld",
        &["Bács-Kiskun", "Békés", "Csongrád-Csanád"],
    ),
];

/// Hungarian counties plus the capital, each addressable on its own.
const HUNGARIAN_COUNTIES: [&str; 20] = [
    "Budapest",
    "Bács-Kiskun",
    "Baranya",
    "Békés",
    "Borsod-Abaúj-Zemplén",
    "Csongrád-Csanád",
    "Fejér",
    "Győr-Moson-Sopron",
    "Hajdú-Bihar",
    "Heves",
    "Jász-Nagykun-Szolnok",
    "Komárom-Esztergom",
    "Nógrád",
    "Pest",
    "Somogy",
    "Szabolcs-Szatmár-Bereg",
    "Tolna",
    "Vas",
    "Veszprém",
    "Zala",
];

/// Countries counted as Europe for continent-wide queries.
const EUROPEAN_COUNTRY_CODES: [&str; 44] = [
    "AL", "AD", "AT", "BY", "BE", "BA", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE",
    "GR", "HU", "IS", "IE", "IT", "LV", "LI", "LT", "LU", "MT", "MD", "MC", "ME", "NL", "MK",
    "NO", "PL", "PT", "RO", "SM", "RS", "SK", "SI", "ES", "SE", "CH", "UA", "GB", "VA",
];

/// The one table every region token goes through. Aliases, statistical
/// regions and subdivisions all live here so resolution has a single
/// deterministic source of truth.
#[derive(Debug, Clone)]
pub struct RegionTable {
    entries: Vec<RegionEntry>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RegionTable {
    /// The built-in table: Hungary with its regions and counties, Europe,
    /// and the global scope.
    pub fn builtin() -> Self {
        let mut entries = Vec::new();

        entries.push(RegionEntry {
            key: "hungary".to_string(),
            display_name: "Hungary".to_string(),
            aliases: ["HU", "Hungary", "Magyarország", "country"]
                .map(String::from)
                .to_vec(),
            bound: ScopeBound::Country {
                code: "HU".to_string(),
            },
            subdivisions: Vec::new(),
        });
        entries.push(RegionEntry {
            key: "europe".to_string(),
            display_name: "Europe".to_string(),
            aliases: ["EU", "Europe", "Európa", "continent"]
                .map(String::from)
                .to_vec(),
            bound: ScopeBound::Continent {
                country_codes: EUROPEAN_COUNTRY_CODES.map(String::from).to_vec(),
            },
            subdivisions: Vec::new(),
        });
        entries.push(RegionEntry {
            key: "global".to_string(),
            display_name: "Global".to_string(),
            aliases: ["GLOBAL", "Global", "World", "world"]
                .map(String::from)
                .to_vec(),
            bound: ScopeBound::Global,
            subdivisions: Vec::new(),
        });

        for (key, display_name, counties) in HUNGARIAN_REGIONS {
            entries.push(RegionEntry {
                key: key.to_string(),
                display_name: display_name.to_string(),
                aliases: vec![display_name.to_string()],
                bound: ScopeBound::Country {
                    code: "HU".to_string(),
                },
                subdivisions: counties.iter().map(|c| c.to_string()).collect(),
            });
        }

        for county in HUNGARIAN_COUNTIES {
            entries.push(RegionEntry {
                key: county.to_lowercase(),
                display_name: county.to_string(),
                aliases: vec![county.to_string()],
                bound: ScopeBound::Country {
                    code: "HU".to_string(),
                },
                subdivisions: vec![county.to_string()],
            });
        }

        Self { entries }
    }

    /// Maps a free-form region token onto a scope.
    ///
    /// Resolution is deterministic: exact alias match first, then
    /// case-insensitive alias match, then substring matching against
    /// statistical region names, then against subdivision names. The same
    /// token always resolves to the same scope.
    ///
    /// # Errors
    ///
    /// [`RegionResolutionError::EmptyToken`] for a blank token,
    /// [`RegionResolutionError::UnknownToken`] when nothing matches.
    pub fn resolve(&self, token: &str) -> Result<RegionScope, RegionResolutionError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(RegionResolutionError::EmptyToken);
        }

        for entry in &self.entries {
            if entry.aliases.iter().any(|alias| alias == trimmed) {
                return Ok(entry.scope());
            }
        }

        let lowered = trimmed.to_lowercase();
        for entry in &self.entries {
            if entry
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == lowered)
            {
                debug!("region token '{trimmed}' matched case-insensitively");
                return Ok(entry.scope());
            }
        }

        for entry in self.entries.iter().filter(|e| e.is_sub_region()) {
            let name = entry.display_name.to_lowercase();
            if name.contains(&lowered) || lowered.contains(&name) {
                debug!(
                    "region token '{trimmed}' matched sub-region '{}'",
                    entry.display_name
                );
                return Ok(entry.scope());
            }
        }

        for entry in self.entries.iter().filter(|e| e.is_subdivision()) {
            let name = entry.display_name.to_lowercase();
            if name.contains(&lowered) || lowered.contains(&name) {
                debug!(
                    "region token '{trimmed}' matched subdivision '{}'",
                    entry.display_name
                );
                return Ok(entry.scope());
            }
        }

        Err(RegionResolutionError::UnknownToken(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_resolves_to_whole_country() {
        let table = RegionTable::default();
        let scope = table.resolve("HU").unwrap();
        assert_eq!(
            scope.bound,
            ScopeBound::Country {
                code: "HU".to_string()
            }
        );
        assert!(scope.subdivisions.is_empty());
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let table = RegionTable::default();
        assert_eq!(table.resolve("hungary").unwrap().key, "hungary");
        assert_eq!(table.resolve("EUROPE").unwrap().key, "europe");
        assert_eq!(table.resolve("  global  ").unwrap().key, "global");
    }

    #[test]
    fn statistical_region_narrows_to_its_counties() {
        let table = RegionTable::default();
        let scope = table.resolve("Észak-Magyarország").unwrap();
        assert_eq!(
            scope.bound,
            ScopeBound::Country {
                code: "HU".to_string()
            }
        );
        assert_eq!(
            scope.subdivisions,
            vec!["Borsod-Abaúj-Zemplén", "Heves", "Nógrád"]
        );
    }

    #[test]
    fn partial_region_name_matches_by_substring() {
        let table = RegionTable::default();
        let scope = table.resolve("dél-alföld").unwrap();
        assert_eq!(scope.key, "del-alfold");
        assert_eq!(scope.subdivisions.len(), 3);
    }

    #[test]
    fn county_resolves_to_single_subdivision() {
        let table = RegionTable::default();
        let scope = table.resolve("Heves").unwrap();
        assert_eq!(scope.subdivisions, vec!["Heves"]);
    }

    #[test]
    fn continent_carries_country_codes() {
        let table = RegionTable::default();
        let scope = table.resolve("Europe").unwrap();
        match scope.bound {
            ScopeBound::Continent { country_codes } => {
                assert!(country_codes.contains(&"HU".to_string()));
                assert!(country_codes.contains(&"DE".to_string()));
            }
            other => panic!("unexpected bound: {other:?}"),
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        let table = RegionTable::default();
        assert_eq!(
            table.resolve("Atlantis"),
            Err(RegionResolutionError::UnknownToken("Atlantis".to_string()))
        );
        assert_eq!(table.resolve("   "), Err(RegionResolutionError::EmptyToken));
    }

    #[test]
    fn resolution_is_deterministic() {
        let table = RegionTable::default();
        let first = table.resolve("Pest").unwrap();
        for _ in 0..10 {
            assert_eq!(table.resolve("Pest").unwrap(), first);
        }
    }
}
