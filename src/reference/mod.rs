// src/reference/mod.rs
//
// First pass over the dossier. Collects every code list, the association
// graph and an index of organisation names/DUNS numbers. Person profiles are
// never materialised here.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::code_tables::CodeTable;
use crate::errors::MapperResult;
use crate::xml::{Element, ElementStream};

/// One declared associate pair, as written under its source profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEdge {
    pub source_id: String,
    pub target_id: String,
    pub relation_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgEntry {
    pub primary_name: Option<String>,
    pub duns_number: Option<String>,
}

/// Lookup state handed from the reference pass to the mapping pass.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub countries: CodeTable,
    pub description1: CodeTable,
    pub description2: CodeTable,
    pub description3: CodeTable,
    pub references: CodeTable,
    pub relation_types: CodeTable,
    pub relationships: HashMap<String, Vec<RelationshipEdge>>,
    pub org_index: HashMap<String, OrgEntry>,
}

impl ReferenceTables {
    pub fn edges_from(&self, profile_id: &str) -> &[RelationshipEdge] {
        self.relationships
            .get(profile_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Relation code declared on the other side of the pair, if any.
    pub fn reverse_code(&self, source_id: &str, target_id: &str) -> Option<&str> {
        self.edges_from(target_id)
            .iter()
            .find(|edge| edge.target_id == source_id)
            .map(|edge| edge.relation_code.as_str())
    }

    pub fn org_name(&self, org_id: &str) -> Option<&str> {
        self.org_index
            .get(org_id)
            .and_then(|entry| entry.primary_name.as_deref())
    }

    pub fn org_duns(&self, org_id: &str) -> Option<&str> {
        self.org_index
            .get(org_id)
            .and_then(|entry| entry.duns_number.as_deref())
    }

    pub fn edge_count(&self) -> usize {
        self.relationships.values().map(Vec::len).sum()
    }
}

pub struct ReferenceBuilder;

impl ReferenceBuilder {
    /// Element paths captured during the reference pass.
    pub const TARGETS: [&'static str; 8] = [
        "CountryList",
        "Description1List",
        "Description2List",
        "Description3List",
        "SanctionsReferencesList",
        "RelationshipList",
        "Associations",
        "Entity",
    ];

    pub fn build(input: &Path) -> MapperResult<ReferenceTables> {
        let stream = ElementStream::open(input, &Self::TARGETS)?;
        Self::build_from_stream(stream)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> MapperResult<ReferenceTables> {
        Self::build_from_stream(ElementStream::from_reader(reader, &Self::TARGETS))
    }

    fn build_from_stream<R: BufRead>(stream: ElementStream<R>) -> MapperResult<ReferenceTables> {
        let start = Instant::now();
        let mut tables = ReferenceTables::default();
        for captured in stream {
            let element = captured?;
            Self::absorb(&mut tables, &element);
        }
        info!(
            "Reference pass finished in {:.2?}: {} countries, {}/{}/{} description codes, {} references, {} relation types, {} profiles with associates ({} edges), {} organisations indexed",
            start.elapsed(),
            tables.countries.len(),
            tables.description1.len(),
            tables.description2.len(),
            tables.description3.len(),
            tables.references.len(),
            tables.relation_types.len(),
            tables.relationships.len(),
            tables.edge_count(),
            tables.org_index.len()
        );
        Ok(tables)
    }

    fn absorb(tables: &mut ReferenceTables, element: &Element) {
        match element.name.as_str() {
            "CountryList" => {
                load_attr_pairs(&mut tables.countries, element, "CountryName", "code", "name")
            }
            "Description1List" => {
                load_text_codes(&mut tables.description1, element, "Description1Name", "Description1Id")
            }
            "Description2List" => {
                load_text_codes(&mut tables.description2, element, "Description2Name", "Description2Id")
            }
            "Description3List" => {
                load_text_codes(&mut tables.description3, element, "Description3Name", "Description3Id")
            }
            "SanctionsReferencesList" => {
                load_attr_pairs(&mut tables.references, element, "ReferenceName", "code", "name")
            }
            "RelationshipList" => {
                for rel in element.children_named("Relationship") {
                    if let (Some(code), Some(name)) = (rel.attr("code"), rel.attr("name")) {
                        tables.relation_types.insert(code, name.replace('_', "-"));
                    }
                }
            }
            "Associations" => load_associations(tables, element),
            "Entity" => index_organisation(tables, element),
            other => debug!("Ignoring unexpected reference element <{}>", other),
        }
    }
}

fn load_attr_pairs(table: &mut CodeTable, list: &Element, child: &str, key: &str, value: &str) {
    for entry in list.children_named(child) {
        if let (Some(code), Some(name)) = (entry.attr(key), entry.attr(value)) {
            table.insert(code, name);
        }
    }
}

fn load_text_codes(table: &mut CodeTable, list: &Element, child: &str, id_attr: &str) {
    for entry in list.children_named(child) {
        if let (Some(code), Some(name)) = (entry.attr(id_attr), entry.text()) {
            table.insert(code, name);
        }
    }
}

fn load_associations(tables: &mut ReferenceTables, block: &Element) {
    for holder in ["PublicFigure", "SpecialEntity"] {
        for profile in block.children_named(holder) {
            let Some(source_id) = profile.attr("id") else {
                continue;
            };
            let edges = tables
                .relationships
                .entry(source_id.to_string())
                .or_default();
            for associate in profile.children_named("Associate") {
                if let (Some(target_id), Some(code)) = (associate.attr("id"), associate.attr("code")) {
                    edges.push(RelationshipEdge {
                        source_id: source_id.to_string(),
                        target_id: target_id.to_string(),
                        relation_code: code.to_string(),
                    });
                }
            }
        }
    }
}

fn index_organisation(tables: &mut ReferenceTables, entity: &Element) {
    let Some(id) = entity.attr("id") else {
        return;
    };

    let primary_name = entity
        .find_all("NameDetails/Name")
        .into_iter()
        .find(|name| name.attr("NameType") == Some("Primary Name"))
        .and_then(|name| {
            name.children_named("NameValue")
                .find_map(|value| value.child_text("EntityName"))
        })
        .map(str::to_string);

    let duns_number = entity
        .find_all("IDNumberTypes/ID")
        .into_iter()
        .find(|id_record| id_record.attr("IDType") == Some("DUNS Number"))
        .and_then(|id_record| id_record.children_named("IDValue").find_map(Element::text))
        .map(str::to_string);

    if primary_name.is_some() || duns_number.is_some() {
        tables.org_index.insert(
            id.to_string(),
            OrgEntry {
                primary_name,
                duns_number,
            },
        );
    }
}
