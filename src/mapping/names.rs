// src/mapping/names.rs
use log::warn;

use crate::models::{category, NameEntry, NormalizedRecord, RecordType, StatPack};
use crate::utils::constants::{MAX_NAME_TYPE_CHARS, MAX_ORG_NAME_WORDS, MAX_PERSON_NAME_WORDS};
use crate::xml::Element;

use super::truncate_words;

pub const PRIMARY_NAME_TYPE: &str = "PRIMARY";
pub const ORIGINAL_SCRIPT_NAME_TYPE: &str = "ORIGINAL-SCRIPT";

/// Cuts the label to its maximum length; anything mentioning PRIMARY
/// becomes the canonical primary tag.
pub fn name_type_label(raw: &str) -> String {
    let label: String = raw.chars().take(MAX_NAME_TYPE_CHARS).collect();
    if label.to_uppercase().contains(PRIMARY_NAME_TYPE) {
        PRIMARY_NAME_TYPE.to_string()
    } else {
        label
    }
}

fn capped(
    value: Option<&str>,
    max_words: usize,
    counter: &str,
    stats: &mut StatPack,
) -> Option<String> {
    let value = value?;
    let (kept, truncated) = truncate_words(value, max_words);
    if truncated {
        stats.record_example(category::TRUNCATIONS, counter, value);
    }
    Some(kept)
}

pub(crate) fn map_names(
    profile: &Element,
    record_type: RecordType,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) {
    let mut conflict = false;

    for name in profile.find_all("NameDetails/Name") {
        let name_type = name_type_label(name.attr("NameType").unwrap_or_default());

        for value in name.children_named("NameValue") {
            stats.record(category::NAME_TYPE, &name_type);
            let mut entry = NameEntry::new(name_type.clone());

            entry.org = capped(
                value.child_text("EntityName"),
                MAX_ORG_NAME_WORDS,
                "longNameOrgCnt",
                stats,
            );
            entry.last = capped(
                value.child_text("Surname"),
                MAX_PERSON_NAME_WORDS,
                "longNameLastCnt",
                stats,
            );
            if entry.last.is_none() {
                entry.last = capped(
                    value.child_text("MaidenName"),
                    MAX_PERSON_NAME_WORDS,
                    "longNameMaidenCnt",
                    stats,
                );
            }
            entry.first = capped(
                value.child_text("FirstName"),
                MAX_PERSON_NAME_WORDS,
                "longNameFirstCnt",
                stats,
            );
            entry.middle = capped(
                value.child_text("MiddleName"),
                MAX_PERSON_NAME_WORDS,
                "longNameMiddleCnt",
                stats,
            );
            entry.prefix = value.child_text("TitleHonorific").map(str::to_string);
            entry.suffix = value.child_text("Suffix").map(str::to_string);

            let is_person = record_type == RecordType::Person;
            if (is_person && entry.org.is_some()) || (!is_person && entry.last.is_some()) {
                conflict = true;
            }
            record.names.push(entry);

            if let Some(script) = value.child_text("OriginalScriptName") {
                stats.record(category::NAME_TYPE, ORIGINAL_SCRIPT_NAME_TYPE);
                let mut original = NameEntry::new(ORIGINAL_SCRIPT_NAME_TYPE);
                original.full = Some(script.to_string());
                record.names.push(original);
            }
        }
    }

    if conflict {
        warn!(
            "Person and organization names on record {}",
            record.record_id
        );
    }
}
