// src/mapping/descriptions.rs
//
// Positional flat fields: Description<n>, <RoleType><n>, Reference<n>.

use log::warn;

use crate::code_tables::CodeTable;
use crate::models::{category, NormalizedRecord, RecordType, StatPack};
use crate::reference::ReferenceTables;
use crate::xml::Element;

use super::dates::concat_date_parts;
use super::rules::reclassification;

pub const DESCRIPTION_SEPARATOR: &str = " | ";

/// Maps descriptions and returns the reclassified record type, if any
/// description's third level names one. The last such description wins.
pub(crate) fn map_descriptions(
    refs: &ReferenceTables,
    profile: &Element,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) -> Option<RecordType> {
    let levels: [(&str, &CodeTable); 3] = [
        ("Description1", &refs.description1),
        ("Description2", &refs.description2),
        ("Description3", &refs.description3),
    ];
    let mut item = 0;
    let mut reclassified = None;

    for description in profile.find_all("Descriptions/Description") {
        let mut parts = Vec::with_capacity(3);
        for (attr, table) in levels.iter() {
            let Some(code) = description.attr(attr) else {
                continue;
            };
            match table.get(code) {
                Some(name) => parts.push(format!("{}={}", code, name)),
                None => stats.record_example(category::UNMAPPED, attr, code),
            }
        }

        if !parts.is_empty() {
            item += 1;
            let text = parts.join(DESCRIPTION_SEPARATOR);
            stats.record_example(category::DESCRIPTIONS, &text, &record.record_id);
            record
                .attributes
                .insert(format!("Description{}", item), text);
        }

        if let Some(record_type) = description
            .attr("Description3")
            .and_then(|code| refs.description3.get(code))
            .and_then(reclassification)
        {
            reclassified = Some(record_type);
        }
    }
    reclassified
}

/// One field per occupation title, numbered within its role type.
pub(crate) fn map_roles(profile: &Element, record: &mut NormalizedRecord, stats: &mut StatPack) {
    for roles in profile.find_all("RoleDetail/Roles") {
        let Some(role_type) = roles.attr("RoleType") else {
            continue;
        };
        for (idx, title) in roles.children_named("OccTitle").enumerate() {
            let since = concat_date_parts(
                title.attr("SinceDay"),
                title.attr("SinceMonth"),
                title.attr("SinceYear"),
            );
            let to = concat_date_parts(title.attr("ToDay"), title.attr("ToMonth"), title.attr("ToYear"));

            let mut role = title.text().unwrap_or_default().to_string();
            if !since.is_empty() {
                role.push_str(" From ");
                role.push_str(&since);
            }
            if !to.is_empty() {
                role.push_str(" To ");
                role.push_str(&to);
            }
            let role = role.trim();
            if role.is_empty() {
                continue;
            }
            stats.record_example(category::OTHER, "ROLES", role);
            record
                .attributes
                .insert(format!("{}{}", role_type, idx + 1), role);
        }
    }
}

pub(crate) fn map_references(
    refs: &ReferenceTables,
    profile: &Element,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) {
    let mut item = 0;
    for reference in profile.find_all("SanctionsReferences/Reference") {
        let Some(code) = reference.text() else {
            continue;
        };
        match refs.references.get(code) {
            Some(name) => {
                item += 1;
                record.attributes.insert(format!("Reference{}", item), name);
                stats.record_example(category::OTHER, "REFERENCES", name);
            }
            None => {
                warn!(
                    "Reference code {} on record {} is not in the reference list",
                    code, record.record_id
                );
                stats.record_example(category::UNMAPPED, "Reference", code);
            }
        }
    }
}
