// src/mapping/addresses.rs
use crate::models::{category, AddressEntry, FeatureMap, NormalizedRecord, StatPack};
use crate::utils::constants::MAX_ORG_NAME_WORDS;
use crate::xml::Element;

use super::{truncate_words, RecordMapper};

pub const BUSINESS_ADDRESS_TYPE: &str = "BUSINESS";

fn build_address(
    mapper: &RecordMapper<'_>,
    block: &Element,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) -> AddressEntry {
    let mut address = AddressEntry::default();

    if let Some(line) = block.child_text("AddressLine") {
        let (kept, truncated) = truncate_words(line, MAX_ORG_NAME_WORDS);
        if truncated {
            stats.record_example(category::TRUNCATIONS, "longAddrLineCnt", line);
        }
        address.line1 = Some(kept);
    }
    address.city = block.child_text("AddressCity").map(str::to_string);
    if let Some(country) = block.child_text("AddressCountry") {
        address.country = Some(mapper.resolve_country(country, record));
    }
    address
}

pub(crate) fn map_addresses(
    mapper: &RecordMapper<'_>,
    profile: &Element,
    record: &mut NormalizedRecord,
    stats: &mut StatPack,
) {
    for block in profile.children_named("Address") {
        let address = build_address(mapper, block, record, stats);
        if address == AddressEntry::default() {
            continue;
        }
        record.addresses.push(address);
        stats.record(category::ADDRESS, "UNTYPED");
    }

    for block in profile.children_named("CompanyDetails") {
        let mut address = build_address(mapper, block, record, stats);
        address.addr_type = Some(BUSINESS_ADDRESS_TYPE.to_string());
        record.company_addresses.push(address);
        stats.record(category::ADDRESS, BUSINESS_ADDRESS_TYPE);

        if let Some(url) = block.child_text("URL") {
            record
                .company_websites
                .push(FeatureMap::single("WEBSITE_ADDRESS", url));
            stats.record(category::ATTRIBUTE, "WEBSITE_ADDRESS");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_tables::IsoCodes;
    use crate::models::RecordType;
    use crate::reference::ReferenceTables;

    fn map(xml: &str) -> (NormalizedRecord, StatPack) {
        let iso = IsoCodes {
            countries: [("france", "FRA")].into_iter().collect(),
            states: Default::default(),
        };
        let refs = ReferenceTables::default();
        let mapper = RecordMapper::new(&iso, &refs, "DJ-HRF", false);
        let profile = Element::parse(xml).unwrap();
        let mut record = NormalizedRecord::new("DJ-HRF", "7", RecordType::Organization);
        let mut stats = StatPack::new();
        map_addresses(&mapper, &profile, &mut record, &mut stats);
        (record, stats)
    }

    #[test]
    fn test_plain_addresses_and_empty_skip() {
        let (record, stats) = map(
            r#"<Entity id="7">
                <Address><AddressLine>1 Rue de Rivoli</AddressLine><AddressCity>Paris</AddressCity><AddressCountry>FRANCE</AddressCountry></Address>
                <Address><AddressLine> </AddressLine></Address>
                <Address/>
            </Entity>"#,
        );
        assert_eq!(record.addresses.len(), 1);
        let address = &record.addresses[0];
        assert_eq!(address.addr_type, None);
        assert_eq!(address.line1.as_deref(), Some("1 Rue de Rivoli"));
        assert_eq!(address.city.as_deref(), Some("Paris"));
        assert_eq!(address.country.as_deref(), Some("FRA"));
        assert!(record.iso_country_codes.contains("FRA"));
        assert_eq!(stats.count(category::ADDRESS, "UNTYPED"), 1);
    }

    #[test]
    fn test_company_details_are_business_addresses() {
        let (record, stats) = map(
            r#"<Entity id="7"><CompanyDetails>
                <AddressLine>Tower 2</AddressLine>
                <AddressCountry>Atlantis</AddressCountry>
                <URL>www.acme.example</URL>
            </CompanyDetails></Entity>"#,
        );
        assert!(record.addresses.is_empty());
        assert_eq!(record.company_addresses.len(), 1);
        let address = &record.company_addresses[0];
        assert_eq!(address.addr_type.as_deref(), Some(BUSINESS_ADDRESS_TYPE));
        assert_eq!(address.line1.as_deref(), Some("Tower 2"));
        assert_eq!(address.country.as_deref(), Some("Atlantis"));
        assert!(record.iso_country_codes.is_empty());
        assert_eq!(record.company_websites.len(), 1);
        assert_eq!(
            record.company_websites[0].get("WEBSITE_ADDRESS"),
            Some("www.acme.example")
        );
        assert_eq!(stats.count(category::ADDRESS, BUSINESS_ADDRESS_TYPE), 1);
        assert_eq!(stats.count(category::ATTRIBUTE, "WEBSITE_ADDRESS"), 1);
    }

    #[test]
    fn test_address_line_capped_at_sixteen_words() {
        let words: Vec<String> = (1..=18).map(|n| format!("w{}", n)).collect();
        let xml = format!(
            "<Entity id=\"7\"><Address><AddressLine>{}</AddressLine></Address></Entity>",
            words.join(" ")
        );
        let (record, stats) = map(&xml);
        let line = record.addresses[0].line1.as_deref().unwrap();
        assert_eq!(line, words[..MAX_ORG_NAME_WORDS].join(" "));
        assert_eq!(line.split_whitespace().count(), 16);
        assert_eq!(stats.count(category::TRUNCATIONS, "longAddrLineCnt"), 1);
    }
}
