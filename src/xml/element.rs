// src/xml/element.rs
//
// Owned subtree handed out by the element stream. Accessors follow the
// "missing means absent" rule: empty attributes and blank text read as None.

use crate::errors::MapperResult;

use super::stream::ElementStream;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<Element>,
    pub(crate) text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parses a standalone XML snippet and returns its root element.
    pub fn parse(xml: &str) -> MapperResult<Element> {
        let mut stream = ElementStream::from_reader(xml.as_bytes(), &["*"]);
        Ok(stream.next_capture()?.unwrap_or_default())
    }

    /// Attribute value, `None` when missing or empty.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed text content, `None` when blank.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Trimmed text of the first child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Element::text)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants reached by a slash separated path of child names,
    /// e.g. `"NameDetails/Name"`, in document order.
    pub fn find_all<'a>(&'a self, path: &str) -> Vec<&'a Element> {
        let mut current: Vec<&Element> = vec![self];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|el| el.children.iter().filter(move |c| c.name == segment))
                .collect();
        }
        current
    }

    pub(crate) fn push_attribute(&mut self, key: String, value: String) {
        self.attributes.push((key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNIPPET: &str = r#"
        <Person id="42" date="01-Jan-2020">
            <Gender>Male</Gender>
            <ActiveStatus> </ActiveStatus>
            <NameDetails>
                <Name NameType="Primary Name">
                    <NameValue><FirstName>John</FirstName></NameValue>
                    <NameValue><FirstName>Jon</FirstName></NameValue>
                </Name>
                <Name NameType="Also Known As">
                    <NameValue><FirstName>Johnny</FirstName></NameValue>
                </Name>
            </NameDetails>
            <Address/>
        </Person>"#;

    #[test]
    fn test_attributes_and_text() {
        let el = Element::parse(SNIPPET).unwrap();
        assert_eq!(el.name, "Person");
        assert_eq!(el.attr("id"), Some("42"));
        assert_eq!(el.attr("missing"), None);
        assert_eq!(el.child_text("Gender"), Some("Male"));
        assert_eq!(el.child_text("ActiveStatus"), None);
        assert!(el.child("Address").is_some());
    }

    #[test]
    fn test_find_all_walks_paths_in_order() {
        let el = Element::parse(SNIPPET).unwrap();
        let names = el.find_all("NameDetails/Name");
        assert_eq!(names.len(), 2);
        let first_names: Vec<&str> = el
            .find_all("NameDetails/Name/NameValue")
            .into_iter()
            .filter_map(|nv| nv.child_text("FirstName"))
            .collect();
        assert_eq!(first_names, vec!["John", "Jon", "Johnny"]);
        assert!(el.find_all("Nope/Name").is_empty());
    }

    #[test]
    fn test_empty_attribute_reads_as_absent() {
        let el = Element::parse(r#"<DateValue Day="" Month="03" Year="1970"/>"#).unwrap();
        assert_eq!(el.attr("Day"), None);
        assert_eq!(el.attr("Month"), Some("03"));
    }
}
