// src/mapping/countries.rs
use crate::code_tables::IsoCodes;
use crate::models::{category, FeatureMap, NormalizedRecord, StatPack};
use crate::xml::Element;

use super::rules::country_attribute;
use super::RecordMapper;

pub const PLACE_OF_BIRTH_ATTR: &str = "PLACE_OF_BIRTH";

/// ISO code for a birthplace: the whole value first, then the text after the
/// first comma, then after the last comma ("Lyon, Rhone, France").
pub fn birthplace_country(iso: &IsoCodes, place: &str) -> Option<String> {
    if let Some(code) = iso.country_code(place) {
        return Some(code.to_string());
    }
    let first = place.find(',')?;
    if let Some(code) = iso.country_code(&place[first + 1..]) {
        return Some(code.to_string());
    }
    let last = place.rfind(',')?;
    iso.country_code(&place[last + 1..]).map(str::to_string)
}

pub(crate) fn map_countries(
    mapper: &RecordMapper<'_>,
    profile: &Element,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) {
    for place in profile.find_all("BirthPlace/Place") {
        let Some(name) = place.attr("name") else {
            continue;
        };
        record
            .countries
            .push(FeatureMap::single(PLACE_OF_BIRTH_ATTR, name));
        stats.record(category::ATTRIBUTE, PLACE_OF_BIRTH_ATTR);
        if let Some(code) = birthplace_country(mapper.iso, name) {
            record.iso_country_codes.insert(code);
        }
    }

    for country in profile.find_all("CountryDetails/Country") {
        let attribute = country_attribute(country.attr("CountryType").unwrap_or_default());
        for value in country.children_named("CountryValue") {
            let Some(code) = value.attr("Code") else {
                continue;
            };
            let resolved = mapper.resolve_country(code, record);
            stats.record_example(category::COUNTRIES, &attribute, &resolved);
            record
                .countries
                .push(FeatureMap::single(attribute.as_str(), resolved));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordType;
    use crate::reference::ReferenceTables;

    #[test]
    fn test_birthplace_fallbacks() {
        let iso = IsoCodes {
            countries: [("france", "FRA"), ("rhone", "XRH")].into_iter().collect(),
            states: Default::default(),
        };
        assert_eq!(birthplace_country(&iso, "France").as_deref(), Some("FRA"));
        assert_eq!(birthplace_country(&iso, "Lyon, France").as_deref(), Some("FRA"));
        assert_eq!(
            birthplace_country(&iso, "Lyon, Rhone, France").as_deref(),
            Some("FRA")
        );
        assert_eq!(birthplace_country(&iso, "Lyon, Rhone").as_deref(), Some("XRH"));
        assert_eq!(birthplace_country(&iso, "Atlantis"), None);
    }

    #[test]
    fn test_places_of_birth_and_country_facts() {
        let iso = IsoCodes {
            countries: [("france", "FRA"), ("canada", "CAN")].into_iter().collect(),
            states: Default::default(),
        };
        let refs = ReferenceTables {
            countries: [("CAN", "Canada")].into_iter().collect(),
            ..Default::default()
        };
        let mapper = RecordMapper::new(&iso, &refs, "DJ-PFA", false);
        let profile = Element::parse(
            r#"<Person id="1">
                <BirthPlace>
                    <Place name="Lyon, France"/>
                    <Place name="Atlantis"/>
                    <Place/>
                </BirthPlace>
                <CountryDetails>
                    <Country CountryType="Citizenship"><CountryValue Code="CAN"/></Country>
                </CountryDetails>
            </Person>"#,
        )
        .unwrap();
        let mut record = NormalizedRecord::new("DJ-PFA", "1", RecordType::Person);
        let mut stats = StatPack::new();
        map_countries(&mapper, &profile, &mut record, &mut stats);

        assert_eq!(record.countries.len(), 3);
        assert_eq!(record.countries[0].get(PLACE_OF_BIRTH_ATTR), Some("Lyon, France"));
        assert_eq!(record.countries[1].get(PLACE_OF_BIRTH_ATTR), Some("Atlantis"));
        assert_eq!(record.countries[2].get("CITIZENSHIP"), Some("CAN"));
        let codes: Vec<&str> = record.iso_country_codes.iter().map(String::as_str).collect();
        assert_eq!(codes, vec!["CAN", "FRA"]);
        assert_eq!(stats.count(category::ATTRIBUTE, PLACE_OF_BIRTH_ATTR), 2);
    }
}
