// src/mapping/relationships.rs
use log::warn;

use crate::models::{category, FeatureMap, NormalizedRecord, RecordType, StatPack};

use super::RecordMapper;

pub const GROUP_ASSOCIATION_ORG_NAME_SUFFIX: &str = "_GROUP_ASSOCIATION_ORG_NAME";

/// Undirected key for a pair of profile ids: both sides produce the same key.
pub fn relationship_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

/// "Business-Associate" -> "Business_Associate".
pub fn relation_label(name: &str) -> String {
    name.replace([' ', '-'], "_")
}

/// Combines the two declared directions; differing labels are joined sorted.
pub fn combined_label(forward: String, reverse: Option<String>) -> String {
    match reverse {
        Some(reverse) if reverse != forward => {
            let mut pair = [forward, reverse];
            pair.sort();
            pair.join("/")
        }
        _ => forward,
    }
}

pub(crate) fn map_relationships(
    mapper: &RecordMapper<'_>,
    record_type: RecordType,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) {
    let refs = mapper.refs;
    let this_id = record.record_id.clone();

    for edge in refs.edges_from(&this_id) {
        let Some(forward) = refs.relation_types.get(&edge.relation_code) else {
            warn!(
                "Relation code {} between {} and {} is not in the relationship list",
                edge.relation_code, this_id, edge.target_id
            );
            stats.record_example(category::UNMAPPED, "Relationship", &edge.relation_code);
            continue;
        };
        let reverse = refs
            .reverse_code(&this_id, &edge.target_id)
            .and_then(|code| refs.relation_types.get(code))
            .map(relation_label);
        let rel_type = combined_label(relation_label(forward), reverse);

        let fact = if mapper.no_relationships {
            FeatureMap::single(
                "Related to",
                format!("{} | {} | {}", mapper.data_source, edge.target_id, rel_type),
            )
        } else {
            let mut fact = FeatureMap::single("RELATIONSHIP_TYPE", rel_type.as_str());
            fact.insert("RELATIONSHIP_KEY", relationship_key(&this_id, &edge.target_id));
            fact
        };
        stats.record(category::RELATIONSHIPS, &rel_type);
        record.relationships.push(fact);

        if record_type != RecordType::Person {
            continue;
        }
        if let Some(org_name) = refs.org_name(&edge.target_id) {
            record.relationships.push(FeatureMap::single(
                format!("{}{}", rel_type, GROUP_ASSOCIATION_ORG_NAME_SUFFIX),
                org_name,
            ));
            stats.record_example(category::GROUP_ASSOCIATION, "NAME", &rel_type);
        }
        if let Some(duns) = refs.org_duns(&edge.target_id) {
            let mut fact = FeatureMap::single(format!("{}_GROUP_ASSN_ID_TYPE", rel_type), "DUNS");
            fact.insert(format!("{}_GROUP_ASSN_ID_NUMBER", rel_type), duns);
            record.relationships.push(fact);
            stats.record_example(category::GROUP_ASSOCIATION, "DUNS", &rel_type);
        }
    }
}
