// src/code_tables/mod.rs
//
// Code -> value tables. The ISO country and state universes are loaded once
// from the shipped JSON assets and stay read-only for the rest of the run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::errors::{MapperError, MapperResult};

pub const ISO_STATES_FILE: &str = "isoStates.json";

#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: HashMap<String, String>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON object of string keys to string values.
    pub fn load(path: &Path) -> MapperResult<Self> {
        if !path.exists() {
            return Err(MapperError::AssetMissing {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path)?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| MapperError::MalformedAsset {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self { entries })
    }

    pub fn insert(&mut self, code: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(code.into(), value.into());
    }

    /// Exact-key lookup.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `code` is one of the table's values (the canonical codes).
    pub fn has_value(&self, code: &str) -> bool {
        self.entries.values().any(|v| v == code)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = CodeTable::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

/// Lower-cases, trims and drops periods, the form the asset keys use.
pub fn normalize_lookup_key(text: &str) -> String {
    text.trim().to_lowercase().replace('.', "")
}

/// The two mandatory universes: country names to ISO codes and
/// state/province names to postal codes.
#[derive(Debug, Clone, Default)]
pub struct IsoCodes {
    pub countries: CodeTable,
    pub states: CodeTable,
}

impl IsoCodes {
    pub fn country_file_name(iso_size: u8) -> String {
        format!("isoCountries{}.json", iso_size)
    }

    pub fn asset_paths(assets_dir: &Path, iso_size: u8) -> (PathBuf, PathBuf) {
        (
            assets_dir.join(Self::country_file_name(iso_size)),
            assets_dir.join(ISO_STATES_FILE),
        )
    }

    pub fn load(assets_dir: &Path, iso_size: u8) -> MapperResult<Self> {
        let (country_path, state_path) = Self::asset_paths(assets_dir, iso_size);
        let countries = CodeTable::load(&country_path)?;
        let states = CodeTable::load(&state_path)?;
        info!(
            "Loaded {} country keys from {} and {} state keys from {}",
            countries.len(),
            country_path.display(),
            states.len(),
            state_path.display()
        );
        Ok(Self { countries, states })
    }

    pub fn country_code(&self, name: &str) -> Option<&str> {
        self.countries.get(&normalize_lookup_key(name))
    }

    pub fn state_code(&self, name: &str) -> Option<&str> {
        self.states.get(&normalize_lookup_key(name))
    }

    pub fn is_country_code(&self, code: &str) -> bool {
        self.countries.has_value(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_reports_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            CodeTable::load(&missing),
            Err(MapperError::AssetMissing { .. })
        ));

        let bad = dir.path().join("bad.json");
        let mut f = fs::File::create(&bad).unwrap();
        writeln!(f, "[1, 2, 3]").unwrap();
        assert!(matches!(
            CodeTable::load(&bad),
            Err(MapperError::MalformedAsset { .. })
        ));
    }

    #[test]
    fn test_iso_lookup_normalizes_names() {
        let iso = IsoCodes {
            countries: [("france", "FRA"), ("us", "USA")].into_iter().collect(),
            states: [("texas", "TX")].into_iter().collect(),
        };
        assert_eq!(iso.country_code("  FRANCE "), Some("FRA"));
        assert_eq!(iso.country_code("U.S."), Some("USA"));
        assert_eq!(iso.state_code("Texas"), Some("TX"));
        assert_eq!(iso.country_code("Atlantis"), None);
        assert!(iso.is_country_code("FRA"));
        assert!(!iso.is_country_code("france"));
    }

    #[test]
    fn test_shipped_assets_load() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        for size in [2u8, 3u8] {
            let iso = IsoCodes::load(&assets, size).unwrap();
            assert!(iso.countries.len() > 200);
            assert!(iso.state_code("new york").is_some());
        }
        let iso3 = IsoCodes::load(&assets, 3).unwrap();
        assert_eq!(iso3.country_code("Canada"), Some("CAN"));
        assert_eq!(iso3.country_code("hong kong"), Some("HKG"));
        let iso2 = IsoCodes::load(&assets, 2).unwrap();
        assert_eq!(iso2.country_code("France"), Some("FR"));
    }

    #[test]
    fn test_shipped_state_postal_codes() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let iso = IsoCodes::load(&assets, 3).unwrap();
        for code in ["PA", "AL", "CO", "DE", "LA", "MA", "MT", "TX"] {
            assert_eq!(iso.state_code(code), Some(code));
        }
        for word in ["or", "oh", "me", "hi", "ok", "in", "id", "as", "on"] {
            assert_eq!(iso.state_code(word), None);
        }
        assert_eq!(iso.state_code("Oregon"), Some("OR"));
        assert_eq!(iso.state_code("Ohio"), Some("OH"));
    }
}
