// src/mapping/rules.rs
//
// Static rule tables. Changing how a source label maps to an output attribute
// is a data edit here, not a code change in the mappers.

use crate::models::RecordType;

/// How an identifier rule recognises its source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMatcher {
    /// Identifier type equals the label (case-insensitive).
    Type(&'static str),
    /// Identifier type contains the fragment (case-insensitive).
    TypeContains(&'static str),
    /// Notes start with the prefix (case-sensitive, as written by the source).
    NoteStartsWith(&'static str),
    /// Upper-cased notes contain the fragment.
    NoteContains(&'static str),
    /// Type is `OTHERS` and upper-cased notes equal the label.
    OthersWithNote(&'static str),
    /// Type is `OTHERS` and upper-cased notes contain the fragment.
    OthersWithNoteContaining(&'static str),
}

impl IdMatcher {
    /// `id_type` must already be upper-cased.
    pub fn matches(&self, id_type: &str, notes: &str) -> bool {
        match *self {
            IdMatcher::Type(label) => id_type == label,
            IdMatcher::TypeContains(fragment) => id_type.contains(fragment),
            IdMatcher::NoteStartsWith(prefix) => notes.starts_with(prefix),
            IdMatcher::NoteContains(fragment) => notes.to_uppercase().contains(fragment),
            IdMatcher::OthersWithNote(label) => id_type == "OTHERS" && notes.to_uppercase() == label,
            IdMatcher::OthersWithNoteContaining(fragment) => {
                id_type == "OTHERS" && notes.to_uppercase().contains(fragment)
            }
        }
    }
}

/// Which locale, if any, is pulled out of the identifier notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleCheck {
    None,
    Country,
    /// Country first; fall back to a state when no country or a US country
    /// was found.
    CountryThenState,
}

#[derive(Debug, Clone, Copy)]
pub struct IdentifierRule {
    pub matchers: &'static [IdMatcher],
    pub number_attr: &'static str,
    pub locale_attr: Option<&'static str>,
    pub locale: LocaleCheck,
}

impl IdentifierRule {
    pub fn matches(&self, id_type_upper: &str, notes: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(id_type_upper, notes))
    }
}

const fn number_only(matchers: &'static [IdMatcher], number_attr: &'static str) -> IdentifierRule {
    IdentifierRule {
        matchers,
        number_attr,
        locale_attr: None,
        locale: LocaleCheck::None,
    }
}

const fn with_country(
    label: &'static [IdMatcher],
    number_attr: &'static str,
    country_attr: &'static str,
) -> IdentifierRule {
    IdentifierRule {
        matchers: label,
        number_attr,
        locale_attr: Some(country_attr),
        locale: LocaleCheck::Country,
    }
}

/// Evaluated in order; the first matching rule wins.
pub static IDENTIFIER_RULES: &[IdentifierRule] = &[
    number_only(&[IdMatcher::Type("SOCIAL SECURITY NO.")], "SSN_NUMBER"),
    with_country(&[IdMatcher::Type("PASSPORT NO.")], "PASSPORT_NUMBER", "PASSPORT_COUNTRY"),
    IdentifierRule {
        matchers: &[IdMatcher::Type("DRIVING LICENCE NO.")],
        number_attr: "DRIVERS_LICENSE_NUMBER",
        locale_attr: Some("DRIVERS_LICENSE_STATE"),
        locale: LocaleCheck::CountryThenState,
    },
    with_country(&[IdMatcher::Type("NATIONAL ID")], "NATIONAL_ID_NUMBER", "NATIONAL_ID_COUNTRY"),
    with_country(&[IdMatcher::Type("NATIONAL TAX NO.")], "TAX_ID_NUMBER", "TAX_ID_COUNTRY"),
    with_country(
        &[IdMatcher::Type("COMPANY IDENTIFICATION NO.")],
        "COMPANY_ID_NUMBER",
        "COMPANY_ID_COUNTRY",
    ),
    number_only(&[IdMatcher::Type("DUNS NUMBER")], "DUNS_NUMBER"),
    number_only(&[IdMatcher::Type("OFAC UNIQUE ID")], "OFAC_ID"),
    number_only(
        &[
            IdMatcher::Type("NATIONAL PROVIDER IDENTIFIER (NPI)"),
            IdMatcher::NoteStartsWith("NPI"),
            IdMatcher::NoteContains("(NPI)"),
        ],
        "NPI_NUMBER",
    ),
    number_only(&[IdMatcher::Type("LEGAL ENTITY IDENTIFIER (LEI)")], "LEI_NUMBER"),
    number_only(
        &[
            IdMatcher::Type("NATIONAL CRIMINAL IDENTIFICATION CODE (USA)"),
            IdMatcher::NoteContains("(NCIC)"),
        ],
        "NCIC_NUMBER",
    ),
    number_only(&[IdMatcher::Type("CENTRAL REGISTRATION DEPOSITORY (CRD)")], "CRD_NUMBER"),
    number_only(
        &[IdMatcher::Type("INTERNATIONAL MARITIME ORGANIZATION (IMO) SHIP NO.")],
        "IMO_NUMBER",
    ),
    number_only(
        &[IdMatcher::Type("INTERNATIONAL SECURITIES IDENTIFICATION NUMBER (ISIN)")],
        "ISIN_NUMBER",
    ),
    number_only(&[IdMatcher::OthersWithNote("MMSI")], "MMSI_NUMBER"),
    number_only(&[IdMatcher::TypeContains("(MSN)")], "AIRCRAFT_MSN"),
    number_only(
        &[IdMatcher::OthersWithNoteContaining("AIRCRAFT TAIL NUMBER")],
        "AIRCRAFT_TAIL_NUMBER",
    ),
];

pub fn identifier_rule(id_type: &str, notes: &str) -> Option<&'static IdentifierRule> {
    let upper = id_type.to_uppercase();
    IDENTIFIER_RULES.iter().find(|rule| rule.matches(&upper, notes))
}

/// Source date type label -> output attribute.
pub static DATE_TYPES: &[(&str, &str)] = &[
    ("Date of Birth", "DATE_OF_BIRTH"),
    ("Deceased Date", "DATE_OF_DEATH"),
    ("Date of Registration", "REGISTRATION_DATE"),
];

pub const BIRTH_DATE_ATTR: &str = "DATE_OF_BIRTH";

/// Unlisted labels pass through unchanged.
pub fn date_attribute(date_type: &str) -> &str {
    DATE_TYPES
        .iter()
        .find(|(label, _)| *label == date_type)
        .map(|(_, attr)| *attr)
        .unwrap_or(date_type)
}

pub const CITIZENSHIP_TYPE: &str = "Citizenship";
pub const CITIZENSHIP_ATTR: &str = "CITIZENSHIP";

/// Country association type -> usage label.
pub static COUNTRY_USAGES: &[(&str, &str)] = &[
    ("REGISTRATION", "REGISTRATION"),
    ("Resident of", "RESIDENT"),
    ("Jurisdiction", "JURISDICTION"),
    ("Country of Affiliation", "AFFILIATED"),
    ("Enhanced Risk Country", "RISK"),
];

pub const OTHER_USAGE: &str = "OTHER";

pub fn country_attribute(country_type: &str) -> String {
    if country_type == CITIZENSHIP_TYPE {
        return CITIZENSHIP_ATTR.to_string();
    }
    let usage = COUNTRY_USAGES
        .iter()
        .find(|(label, _)| *label == country_type)
        .map(|(_, usage)| *usage)
        .unwrap_or(OTHER_USAGE);
    format!("{}_COUNTRY_OF_ASSOCIATION", usage)
}

/// Upper-cased third-level description -> reclassified record type.
pub static RECLASSIFICATIONS: &[(&str, RecordType)] = &[
    ("SHIP", RecordType::Vessel),
    ("AIRCRAFT", RecordType::Aircraft),
];

pub fn reclassification(description3: &str) -> Option<RecordType> {
    let upper = description3.to_uppercase();
    RECLASSIFICATIONS
        .iter()
        .find(|(label, _)| *label == upper)
        .map(|(_, record_type)| *record_type)
}
