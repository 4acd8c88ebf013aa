// src/composite_keys.rs
//
// Derived matching keys built from a finished record: each name variant
// crossed with birth periods, ISO countries and associated organisations.

use std::collections::HashSet;

use crate::mapping::relationships::GROUP_ASSOCIATION_ORG_NAME_SUFFIX;
use crate::mapping::rules::BIRTH_DATE_ATTR;
use crate::models::{FeatureMap, NameEntry, NormalizedRecord};
use crate::utils::constants::COMPOSITE_KEY_DELIMITER;

pub const NAME_DOB: &str = "NAME_DOB";
pub const NAME_DOB_CNTRY: &str = "NAME_DOB_CNTRY";
pub const NAME_CNTRY: &str = "NAME_CNTRY";
pub const NAME_ORG: &str = "NAME_ORG";

/// Upper-cased tokens with periods and commas removed, sorted and joined
/// with the key delimiter. Empty when the name has no tokens.
pub fn canonicalize_name(name: &str) -> String {
    let upper = name.to_uppercase().replace(['.', ','], "");
    let mut tokens: Vec<&str> = upper.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(COMPOSITE_KEY_DELIMITER)
}

/// Name used for keys: the organisation name, else "last first middle",
/// else the full (original script) form.
fn key_name(entry: &NameEntry) -> Option<String> {
    entry
        .org
        .clone()
        .or_else(|| entry.person_name())
        .or_else(|| entry.full.clone())
}

/// Year and year-month fragments of the canonical birth dates, in order.
pub fn birth_periods(record: &NormalizedRecord) -> Vec<String> {
    let mut periods = Vec::new();
    for date in &record.dates {
        let Some(dob) = date.get(BIRTH_DATE_ATTR) else {
            continue;
        };
        if dob.len() >= 4 {
            periods.push(dob[..4].to_string());
        }
        if dob.len() >= 7 {
            periods.push(dob[..7].to_string());
        }
    }
    dedup(periods)
}

fn associated_orgs(record: &NormalizedRecord) -> Vec<String> {
    let orgs = record
        .relationships
        .iter()
        .flat_map(FeatureMap::iter)
        .filter(|(key, _)| key.ends_with(GROUP_ASSOCIATION_ORG_NAME_SUFFIX))
        .map(|(_, org)| canonicalize_name(org))
        .filter(|org| !org.is_empty())
        .collect();
    dedup(orgs)
}

fn join_key(parts: &[&str]) -> String {
    parts.join(COMPOSITE_KEY_DELIMITER)
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

pub fn generate(record: &NormalizedRecord) -> Vec<FeatureMap> {
    let periods = birth_periods(record);
    let countries: Vec<&str> = record.iso_country_codes.iter().map(String::as_str).collect();
    let orgs = associated_orgs(record);

    let names = dedup(
        record
            .names
            .iter()
            .filter_map(key_name)
            .map(|name| canonicalize_name(&name))
            .filter(|name| !name.is_empty())
            .collect(),
    );

    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    let mut push = |label: &str, value: String| {
        if seen.insert((label.to_string(), value.clone())) {
            keys.push(FeatureMap::single(label, value));
        }
    };

    for name in names.iter().map(String::as_str) {
        for period in periods.iter().map(String::as_str) {
            push(NAME_DOB, join_key(&[name, period]));
            for &country in &countries {
                push(NAME_DOB_CNTRY, join_key(&[name, period, country]));
            }
        }
        for &country in &countries {
            push(NAME_CNTRY, join_key(&[name, country]));
        }
        for org in orgs.iter().map(String::as_str) {
            push(NAME_ORG, join_key(&[name, org]));
        }
    }
    keys
}
