// src/mapping/identifiers.rs
use crate::locale;
use crate::models::{category, FeatureMap, NormalizedRecord, StatPack};
use crate::xml::Element;

use super::rules::{identifier_rule, LocaleCheck};
use super::RecordMapper;

/// A code pulled out of identifier notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Country(String),
    State(String),
}

impl Located {
    pub fn code(&self) -> &str {
        match self {
            Located::Country(code) | Located::State(code) => code,
        }
    }
}

fn is_us(code: &str) -> bool {
    matches!(code, "USA" | "US")
}

impl RecordMapper<'_> {
    /// Country or state code named in the notes, following the rule's check.
    pub fn locate(&self, check: LocaleCheck, notes: &str) -> Option<Located> {
        match check {
            LocaleCheck::None => None,
            LocaleCheck::Country => {
                locale::resolve(notes, &self.iso.countries).map(Located::Country)
            }
            LocaleCheck::CountryThenState => {
                let country = locale::resolve(notes, &self.iso.countries);
                match country {
                    Some(code) if !is_us(&code) => Some(Located::Country(code)),
                    _ => locale::resolve(notes, &self.iso.states).map(Located::State),
                }
            }
        }
    }
}

/// Text kept for identifiers outside the catalog: "type = number[ notes]".
pub fn fallback_text(id_type: &str, number: &str, notes: &str) -> String {
    if notes.is_empty() {
        format!("{} = {}", id_type, number)
    } else {
        format!("{} = {} {}", id_type, number, notes)
    }
}

pub(crate) fn map_identifiers(
    mapper: &RecordMapper<'_>,
    profile: &Element,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) {
    let mut unmapped = 0;

    for id_record in profile.find_all("IDNumberTypes/ID") {
        let id_type = id_record.attr("IDType").unwrap_or_default();

        for value in id_record.children_named("IDValue") {
            let Some(number) = value.text() else {
                continue;
            };
            let notes = value.attr("IDnotes").unwrap_or_default();

            let Some(rule) = identifier_rule(id_type, notes) else {
                unmapped += 1;
                record.attributes.insert(
                    format!("ID{}", unmapped),
                    fallback_text(id_type, number, notes),
                );
                stats.record_example(
                    category::UNKNOWN,
                    &format!("{} | {}", id_type, notes),
                    number,
                );
                continue;
            };

            let located = if notes.is_empty() {
                None
            } else {
                mapper.locate(rule.locale, notes)
            };
            if let Some(Located::Country(code)) = &located {
                record.iso_country_codes.insert(code.clone());
            }

            let mut identifier = FeatureMap::single(rule.number_attr, number);
            if let (Some(attr), Some(found)) = (rule.locale_attr, &located) {
                identifier.insert(attr, found.code());
            }
            record.identifiers.push(identifier);
            stats.record_example(
                category::ID_TYPE,
                &format!(
                    "{} | {}",
                    rule.number_attr,
                    located.as_ref().map_or("None", Located::code)
                ),
                number,
            );
        }
    }
}
