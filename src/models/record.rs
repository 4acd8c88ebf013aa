// src/models/record.rs
//
// The output unit: one normalised record per Person/Entity profile,
// serialised as a single JSON line.

use std::collections::BTreeSet;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Person,
    Organization,
    Vessel,
    Aircraft,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Person => "PERSON",
            RecordType::Organization => "ORGANIZATION",
            RecordType::Vessel => "VESSEL",
            RecordType::Aircraft => "AIRCRAFT",
        }
    }

    /// Record type implied by a profile element name.
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "Person" => Some(RecordType::Person),
            "Entity" => Some(RecordType::Organization),
            _ => None,
        }
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Insertion-ordered string map, serialised as a JSON object.
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap(Vec<(String, String)>);

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FeatureMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameEntry {
    #[serde(rename = "NAME_TYPE", skip_serializing_if = "String::is_empty")]
    pub name_type: String,
    #[serde(rename = "NAME_ORG", skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(rename = "NAME_LAST", skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(rename = "NAME_FIRST", skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(rename = "NAME_MIDDLE", skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    #[serde(rename = "NAME_PREFIX", skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(rename = "NAME_SUFFIX", skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(rename = "NAME_FULL", skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
}

impl NameEntry {
    pub fn new(name_type: impl Into<String>) -> Self {
        Self {
            name_type: name_type.into(),
            ..Default::default()
        }
    }

    /// "last first middle" for person parts, blank parts skipped.
    pub fn person_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.last, &self.first, &self.middle]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
    #[serde(rename = "ADDR_TYPE", skip_serializing_if = "Option::is_none")]
    pub addr_type: Option<String>,
    #[serde(rename = "ADDR_LINE1", skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(rename = "ADDR_CITY", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "ADDR_COUNTRY", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "DATA_SOURCE")]
    pub data_source: String,
    #[serde(rename = "RECORD_ID")]
    pub record_id: String,
    #[serde(rename = "ENTITY_TYPE")]
    pub entity_type: RecordType,
    #[serde(rename = "RECORD_TYPE")]
    pub record_type: RecordType,
    #[serde(rename = "LAST_UPDATE", skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(rename = "STATUS", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "DJ_PROFILE_ID")]
    pub dj_profile_id: String,
    #[serde(rename = "GENDER", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "DECEASED", skip_serializing_if = "Option::is_none")]
    pub deceased: Option<String>,
    #[serde(rename = "NAMES", skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<NameEntry>,
    #[serde(rename = "DATES", skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<FeatureMap>,
    #[serde(rename = "ADDRESSES", skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<AddressEntry>,
    #[serde(rename = "COMPANY_ADDRESSES", skip_serializing_if = "Vec::is_empty")]
    pub company_addresses: Vec<AddressEntry>,
    #[serde(rename = "COMPANY_WEBSITES", skip_serializing_if = "Vec::is_empty")]
    pub company_websites: Vec<FeatureMap>,
    #[serde(rename = "COUNTRIES", skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<FeatureMap>,
    #[serde(rename = "IDENTIFIERS", skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<FeatureMap>,
    /// Flat numbered fields: other dates, unmapped ids, descriptions, roles, references.
    #[serde(flatten)]
    pub attributes: FeatureMap,
    #[serde(rename = "RELATIONSHIPS", skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<FeatureMap>,
    #[serde(
        rename = "ISO_COUNTRY_CODES",
        skip_serializing_if = "BTreeSet::is_empty",
        serialize_with = "serialize_country_codes"
    )]
    pub iso_country_codes: BTreeSet<String>,
    #[serde(rename = "COMPOSITE_KEYS", skip_serializing_if = "Vec::is_empty")]
    pub composite_keys: Vec<FeatureMap>,
}

impl NormalizedRecord {
    pub fn new(data_source: &str, record_id: &str, record_type: RecordType) -> Self {
        Self {
            data_source: data_source.to_string(),
            record_id: record_id.to_string(),
            entity_type: record_type,
            record_type,
            last_update: None,
            status: None,
            dj_profile_id: record_id.to_string(),
            gender: None,
            deceased: None,
            names: Vec::new(),
            dates: Vec::new(),
            addresses: Vec::new(),
            company_addresses: Vec::new(),
            company_websites: Vec::new(),
            countries: Vec::new(),
            identifiers: Vec::new(),
            attributes: FeatureMap::new(),
            relationships: Vec::new(),
            iso_country_codes: BTreeSet::new(),
            composite_keys: Vec::new(),
        }
    }

    pub fn set_record_type(&mut self, record_type: RecordType) {
        self.entity_type = record_type;
        self.record_type = record_type;
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn serialize_country_codes<S: Serializer>(
    codes: &BTreeSet<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(codes.len()))?;
    for code in codes {
        seq.serialize_element(&FeatureMap::single("COUNTRY_CODE", code.as_str()))?;
    }
    seq.end()
}
