// src/mapping/dates.rs
use chrono::NaiveDate;

use crate::models::{category, FeatureMap, NormalizedRecord, StatPack};
use crate::xml::Element;

use super::rules::{date_attribute, BIRTH_DATE_ATTR};

/// Layouts tried in order against the joined "day-month-year" string.
const DATE_LAYOUTS: [&str; 8] = [
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d %b %Y",
    "%d %m %Y",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Joins the present parts with '-', e.g. "15-03-1970" or "03-1970".
pub fn concat_date_parts(day: Option<&str>, month: Option<&str>, year: Option<&str>) -> String {
    [day, month, year]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
}

fn month_number(month: &str) -> Option<u32> {
    if let Ok(n) = month.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let lower = month.to_lowercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| lower.starts_with(abbr))
        .map(|idx| idx as u32 + 1)
}

fn valid_year(year: &str) -> bool {
    year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())
}

/// Canonical birth date: YYYY-MM-DD when complete, YYYY-MM or YYYY when
/// partial. Day and month without a year has no canonical form.
pub fn canonical_birth_date(
    day: Option<&str>,
    month: Option<&str>,
    year: Option<&str>,
) -> Option<String> {
    match (day, month, year) {
        (Some(_), Some(_), Some(_)) => {
            parse_date(&concat_date_parts(day, month, year)).map(|d| d.format("%Y-%m-%d").to_string())
        }
        (None, Some(m), Some(y)) if valid_year(y) => {
            month_number(m).map(|n| format!("{}-{:02}", y, n))
        }
        (None, None, Some(y)) if valid_year(y) => Some(y.to_string()),
        _ => None,
    }
}

fn completeness(day: Option<&str>, month: Option<&str>, year: Option<&str>) -> &'static str {
    match (day, month, year) {
        (None, None, _) => "year only",
        (None, Some(_), Some(_)) => "year/month only",
        (Some(_), Some(_), None) => "month/day only",
        _ => "full",
    }
}

pub(crate) fn map_dates(profile: &Element, record: &mut NormalizedRecord, stats: &mut StatPack) {
    for date in profile.find_all("DateDetails/Date") {
        let Some(date_type) = date.attr("DateType") else {
            continue;
        };
        let attribute = date_attribute(date_type);

        for value in date.children_named("DateValue") {
            let (day, month, year) = (value.attr("Day"), value.attr("Month"), value.attr("Year"));
            let raw = concat_date_parts(day, month, year);
            if raw.is_empty() {
                continue;
            }

            if attribute == BIRTH_DATE_ATTR {
                stats.record_example(category::DOB_DATA, completeness(day, month, year), &raw);
                if let Some(canonical) = canonical_birth_date(day, month, year) {
                    record.dates.push(FeatureMap::single(attribute, canonical));
                }
            } else {
                record.attributes.insert(attribute, raw.clone());
            }
            stats.record_example(category::ATTRIBUTE, attribute, &raw);
        }
    }
}
