// src/mapping/mod.rs
//
// Second pass: one Person/Entity element in, one normalised record out.

pub mod addresses;
pub mod countries;
pub mod dates;
pub mod descriptions;
pub mod identifiers;
pub mod names;
pub mod relationships;
pub mod rules;

use crate::code_tables::IsoCodes;
use crate::composite_keys;
use crate::models::{category, NormalizedRecord, RecordType, StatPack};
use crate::reference::ReferenceTables;
use crate::xml::Element;

pub const DECEASED_FLAG: &str = "Yes";

/// Keeps the first `max_words` whitespace separated words. The flag reports
/// whether anything was cut; untouched values are returned verbatim.
pub fn truncate_words(value: &str, max_words: usize) -> (String, bool) {
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.len() > max_words {
        (words[..max_words].join(" "), true)
    } else {
        (value.to_string(), false)
    }
}

/// Holds the read-only lookup state shared by every record in the pass.
pub struct RecordMapper<'a> {
    pub iso: &'a IsoCodes,
    pub refs: &'a ReferenceTables,
    pub data_source: String,
    pub no_relationships: bool,
}

impl<'a> RecordMapper<'a> {
    pub fn new(
        iso: &'a IsoCodes,
        refs: &'a ReferenceTables,
        data_source: impl Into<String>,
        no_relationships: bool,
    ) -> Self {
        Self {
            iso,
            refs,
            data_source: data_source.into(),
            no_relationships,
        }
    }

    /// Source country code or name -> display value. Goes through the
    /// document's country list, then the ISO universe; ISO hits are also
    /// collected on the record.
    pub fn resolve_country(&self, raw: &str, record: &mut NormalizedRecord) -> String {
        let name = self.refs.countries.get(raw).unwrap_or(raw);
        match self.iso.country_code(name) {
            Some(code) => {
                record.iso_country_codes.insert(code.to_string());
                code.to_string()
            }
            None => name.to_string(),
        }
    }

    /// Builds the complete record, composite keys included.
    pub fn map(&self, profile: &Element, hint: RecordType, stats: &mut StatPack) -> NormalizedRecord {
        let id = profile.attr("id").unwrap_or_default();
        let mut record = NormalizedRecord::new(&self.data_source, id, hint);

        record.last_update = profile.attr("date").map(str::to_string);
        record.status = profile.child_text("ActiveStatus").map(str::to_string);
        if let Some(gender) = profile.child_text("Gender") {
            record.gender = Some(gender.to_string());
            stats.record(category::ATTRIBUTE, "GENDER");
        }
        if profile.child_text("Deceased") == Some(DECEASED_FLAG) {
            record.deceased = Some(DECEASED_FLAG.to_string());
            stats.record_example(category::OTHER, "DECEASED", DECEASED_FLAG);
        }

        names::map_names(profile, hint, &mut record, stats);
        dates::map_dates(profile, &mut record, stats);
        addresses::map_addresses(self, profile, &mut record, stats);
        countries::map_countries(self, profile, &mut record, stats);
        identifiers::map_identifiers(self, profile, &mut record, stats);

        let record_type = descriptions::map_descriptions(self.refs, profile, &mut record, stats)
            .unwrap_or(hint);
        descriptions::map_roles(profile, &mut record, stats);
        descriptions::map_references(self.refs, profile, &mut record, stats);
        relationships::map_relationships(self, record_type, &mut record, stats);

        record.set_record_type(record_type);
        stats.record(category::ENTITY_TYPE, record_type.as_str());

        record.composite_keys = composite_keys::generate(&record);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceBuilder;

    const DOC: &str = r#"<PFA>
  <CountryList><CountryName code="FRA" name="France"/><CountryName code="CAN" name="Canada"/></CountryList>
  <RelationshipList><Relationship code="1" name="Employee"/><Relationship code="2" name="Employer"/></RelationshipList>
  <Records>
    <Person id="10" date="01-Feb-2020">
      <Gender>Male</Gender>
      <ActiveStatus>Active</ActiveStatus>
      <Deceased>No</Deceased>
      <NameDetails><Name NameType="Primary Name"><NameValue><FirstName>JOHN</FirstName><Surname>SMITH</Surname></NameValue></Name></NameDetails>
      <CountryDetails>
        <Country CountryType="Citizenship"><CountryValue Code="CAN"/></Country>
        <Country CountryType="Resident of"><CountryValue Code="ZZZ"/></Country>
      </CountryDetails>
      <IDNumberTypes>
        <ID IDType="Passport No."><IDValue IDnotes="(CANADA)">AB123</IDValue></ID>
        <ID IDType="Driving Licence No."><IDValue IDnotes="Texas">TX9</IDValue></ID>
        <ID IDType="Library Card"><IDValue IDnotes="expired">L-1</IDValue></ID>
      </IDNumberTypes>
    </Person>
    <Entity id="20" date="01-Feb-2020">
      <NameDetails><Name NameType="Primary Name"><NameValue><EntityName>Acme Corp</EntityName></NameValue></Name></NameDetails>
      <IDNumberTypes><ID IDType="DUNS Number"><IDValue>987654321</IDValue></ID></IDNumberTypes>
    </Entity>
  </Records>
  <Associations>
    <PublicFigure id="10"><Associate id="20" code="1"/></PublicFigure>
    <SpecialEntity id="20"><Associate id="10" code="2"/></SpecialEntity>
  </Associations>
</PFA>"#;

    fn iso() -> IsoCodes {
        IsoCodes {
            countries: [("canada", "CAN"), ("france", "FRA"), ("united states", "USA")]
                .into_iter()
                .collect(),
            states: [("texas", "TX")].into_iter().collect(),
        }
    }

    fn person() -> Element {
        let xml = &DOC[DOC.find("<Person").unwrap()..DOC.find("</Person>").unwrap() + 9];
        Element::parse(xml).unwrap()
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("a b c", 5), ("a b c".to_string(), false));
        assert_eq!(truncate_words("a  b", 1), ("a".to_string(), true));
        assert_eq!(truncate_words("a  b", 2), ("a  b".to_string(), false));
    }

    #[test]
    fn test_header_countries_and_identifiers() {
        let refs = ReferenceBuilder::from_reader(DOC.as_bytes()).unwrap();
        let iso = iso();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", false);
        let mut stats = StatPack::new();
        let record = mapper.map(&person(), RecordType::Person, &mut stats);

        assert_eq!(record.record_id, "10");
        assert_eq!(record.dj_profile_id, "10");
        assert_eq!(record.last_update.as_deref(), Some("01-Feb-2020"));
        assert_eq!(record.status.as_deref(), Some("Active"));
        assert_eq!(record.gender.as_deref(), Some("Male"));
        assert_eq!(record.deceased, None);

        assert_eq!(record.countries[0].get("CITIZENSHIP"), Some("CAN"));
        assert_eq!(
            record.countries[1].get("RESIDENT_COUNTRY_OF_ASSOCIATION"),
            Some("ZZZ")
        );

        assert_eq!(record.identifiers[0].get("PASSPORT_NUMBER"), Some("AB123"));
        assert_eq!(record.identifiers[0].get("PASSPORT_COUNTRY"), Some("CAN"));
        assert_eq!(record.identifiers[1].get("DRIVERS_LICENSE_STATE"), Some("TX"));
        assert_eq!(
            record.attributes.get("ID1"),
            Some("Library Card = L-1 expired")
        );
        assert_eq!(stats.count(category::UNKNOWN, "Library Card | expired"), 1);
        assert!(record.iso_country_codes.contains("CAN"));
        assert!(record.iso_country_codes.iter().all(|c| iso.is_country_code(c)));
    }

    #[test]
    fn test_licence_postal_code_with_shipped_assets() {
        let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let iso = IsoCodes::load(&assets, 3).unwrap();
        let refs = ReferenceTables::default();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", false);
        let profile = Element::parse(
            r#"<Person id="7"><IDNumberTypes>
                <ID IDType="Driving Licence No."><IDValue IDnotes="NJ">D100</IDValue></ID>
                <ID IDType="Driving Licence No."><IDValue IDnotes="Pennsylvania">D200</IDValue></ID>
                <ID IDType="Driving Licence No."><IDValue IDnotes="OR">D300</IDValue></ID>
                <ID IDType="Driving Licence No."><IDValue IDnotes="PA">D400</IDValue></ID>
            </IDNumberTypes></Person>"#,
        )
        .unwrap();
        let record = mapper.map(&profile, RecordType::Person, &mut StatPack::new());

        assert_eq!(record.identifiers[0].get("DRIVERS_LICENSE_STATE"), Some("NJ"));
        assert_eq!(record.identifiers[1].get("DRIVERS_LICENSE_STATE"), Some("PA"));
        assert_eq!(record.identifiers[2].get("DRIVERS_LICENSE_NUMBER"), Some("D300"));
        assert_eq!(record.identifiers[2].get("DRIVERS_LICENSE_STATE"), None);
        // Countries are tried first, so a bare "PA" is Panama.
        assert_eq!(record.identifiers[3].get("DRIVERS_LICENSE_STATE"), Some("PAN"));
        assert!(record.iso_country_codes.contains("PAN"));
    }

    #[test]
    fn test_relationships_and_group_association() {
        let refs = ReferenceBuilder::from_reader(DOC.as_bytes()).unwrap();
        let iso = iso();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", false);
        let mut stats = StatPack::new();
        let record = mapper.map(&person(), RecordType::Person, &mut stats);

        assert_eq!(record.relationships.len(), 3);
        assert_eq!(
            record.relationships[0].get("RELATIONSHIP_TYPE"),
            Some("Employee/Employer")
        );
        assert_eq!(record.relationships[0].get("RELATIONSHIP_KEY"), Some("10-20"));
        assert_eq!(
            record.relationships[1].get("Employee/Employer_GROUP_ASSOCIATION_ORG_NAME"),
            Some("Acme Corp")
        );
        assert_eq!(
            record.relationships[2].get("Employee/Employer_GROUP_ASSN_ID_NUMBER"),
            Some("987654321")
        );
    }

    #[test]
    fn test_no_relationships_summary() {
        let refs = ReferenceBuilder::from_reader(DOC.as_bytes()).unwrap();
        let iso = iso();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", true);
        let mut stats = StatPack::new();
        let record = mapper.map(&person(), RecordType::Person, &mut stats);
        assert_eq!(
            record.relationships[0].get("Related to"),
            Some("DJ-PFA | 20 | Employee/Employer")
        );
        assert_eq!(record.relationships[0].get("RELATIONSHIP_KEY"), None);
    }

    #[test]
    fn test_mapping_is_repeatable() {
        let refs = ReferenceBuilder::from_reader(DOC.as_bytes()).unwrap();
        let iso = iso();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", false);
        let profile = person();
        let first = mapper
            .map(&profile, RecordType::Person, &mut StatPack::new())
            .to_json_line()
            .unwrap();
        let second = mapper
            .map(&profile, RecordType::Person, &mut StatPack::new())
            .to_json_line()
            .unwrap();
        assert_eq!(first, second);
    }
}
