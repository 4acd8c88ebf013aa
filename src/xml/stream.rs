// src/xml/stream.rs
//
// Streaming capture of selected subtrees. Only elements whose open-tag path
// ends with one of the target paths are materialised; everything else is read
// and dropped, so memory stays bounded by the largest captured profile.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::{MapperError, MapperResult};

use super::element::Element;

enum Step {
    Open(Element),
    Leaf(Element),
    Text(String),
    Close,
    Eof,
    Skip,
}

pub struct ElementStream<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    targets: Vec<Vec<String>>,
    path: Vec<String>,
    done: bool,
}

impl ElementStream<BufReader<File>> {
    pub fn open(path: &Path, targets: &[&str]) -> MapperResult<Self> {
        if !path.exists() {
            return Err(MapperError::InputMissing {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), targets))
    }
}

impl<R: BufRead> ElementStream<R> {
    /// `targets` are slash separated path suffixes such as `"Entity"` or
    /// `"Associations/PublicFigure"`. `"*"` captures the first element seen.
    pub fn from_reader(source: R, targets: &[&str]) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::with_capacity(8 * 1024),
            targets: targets
                .iter()
                .map(|t| t.split('/').map(str::to_string).collect())
                .collect(),
            path: Vec::new(),
            done: false,
        }
    }

    fn is_target(&self) -> bool {
        self.targets.iter().any(|target| {
            if target.len() == 1 && target[0] == "*" {
                return true;
            }
            target.len() <= self.path.len()
                && self.path[self.path.len() - target.len()..]
                    .iter()
                    .zip(target.iter())
                    .all(|(open, want)| open == want)
        })
    }

    /// Reads one event and converts it into an owned step.
    fn step(&mut self) -> MapperResult<Step> {
        self.buf.clear();
        let step = match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(start) => Step::Open(element_from_start(&start)?),
            Event::Empty(start) => Step::Leaf(element_from_start(&start)?),
            Event::Text(text) => Step::Text(text.unescape()?.into_owned()),
            Event::CData(cdata) => {
                Step::Text(String::from_utf8_lossy(&cdata.into_inner()).into_owned())
            }
            Event::End(_) => Step::Close,
            Event::Eof => Step::Eof,
            _ => Step::Skip,
        };
        Ok(step)
    }

    /// Advances to the next matching subtree. `Ok(None)` at end of document.
    pub fn next_capture(&mut self) -> MapperResult<Option<Element>> {
        if self.done {
            return Ok(None);
        }
        loop {
            match self.step()? {
                Step::Open(element) => {
                    self.path.push(element.name.clone());
                    if self.is_target() {
                        return self.capture_subtree(element).map(Some);
                    }
                }
                Step::Leaf(element) => {
                    self.path.push(element.name.clone());
                    let hit = self.is_target();
                    self.path.pop();
                    if hit {
                        return Ok(Some(element));
                    }
                }
                Step::Close => {
                    self.path.pop();
                }
                Step::Eof => {
                    self.done = true;
                    return Ok(None);
                }
                Step::Text(_) | Step::Skip => {}
            }
        }
    }

    /// Reads until the end tag matching `root`, building the owned tree.
    fn capture_subtree(&mut self, root: Element) -> MapperResult<Element> {
        let mut stack = vec![root];
        loop {
            match self.step()? {
                Step::Open(element) => stack.push(element),
                Step::Leaf(element) => {
                    if let Some(open) = stack.last_mut() {
                        open.children.push(element);
                    }
                }
                Step::Text(value) => {
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&value);
                    }
                }
                Step::Close => {
                    let closed = match stack.pop() {
                        Some(el) => el,
                        None => break,
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(closed),
                        None => {
                            self.path.pop();
                            return Ok(closed);
                        }
                    }
                }
                Step::Eof => break,
                Step::Skip => {}
            }
        }
        self.done = true;
        Err(MapperError::TruncatedDocument {
            element: stack
                .first()
                .map(|el| el.name.clone())
                .unwrap_or_default(),
        })
    }
}

impl<R: BufRead> Iterator for ElementStream<R> {
    type Item = MapperResult<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_capture() {
            Ok(Some(captured)) => Some(Ok(captured)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> MapperResult<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.push_attribute(key, value);
    }
    Ok(element)
}
