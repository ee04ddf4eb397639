// src/specs/schema.rs
//! # Record schemas and the table extractor
//!
//! Portal pages carry no semantic markup. Data is identified purely by
//! position: the n-th live cell of a listing, or the value cell next to a
//! caption on a detail page. A [`RecordSchema`] writes that down as data:
//! an ordered list of fields, each with a decoding [`Rule`], plus a layout.
//!
//! ## Layouts
//! - **Rows** (listings): walk matching cells in document order. Cell *i*
//!   goes to field *i mod width* (or to its sibling index, for pages whose
//!   cells are only identifiable by column). A record is complete when its
//!   last column is filled. The first complete record is the portal's
//!   repeated header row and is dropped. Incomplete trailing groups are
//!   discarded.
//! - **Title/value** (detail pages): walk `(caption, value)` cell pairs and
//!   route each value through a caption → field table. Several captions may
//!   name one field (the portal spells some captions two ways). Unknown
//!   captions are skipped; a detail page shows a varying subset of fields.
//!
//! `extract` is lazy and holds no state outside the returned iterator;
//! call it again to start over.

use std::collections::BTreeMap;

use scraper::html::Select;
use scraper::{ ElementRef, Html, Selector };

use crate::core::html::{ first_href, has_class_exact, sibling_index, text_of };
use crate::core::sanitize::{ parse_ratio, Ratio };
use crate::error::{ PortalError, Result };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Text,
    TextWithLink,
    /// `pct% (used/total)`
    Ratio,
}

#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

pub const fn text(name: &'static str) -> Field { Field { name, rule: Rule::Text } }
pub const fn link(name: &'static str) -> Field { Field { name, rule: Rule::TextWithLink } }
pub const fn ratio(name: &'static str) -> Field { Field { name, rule: Rule::Ratio } }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Positioning {
    /// n-th matching cell → column n mod width
    Cyclic,
    /// column = the cell's index among its element siblings
    Sibling,
}

#[derive(Debug)]
enum Layout {
    Rows { class: Option<&'static str>, positioning: Positioning },
    TitleValue { captions: &'static [(&'static str, &'static str)] },
}

#[derive(Debug)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<Field>,
    cells: Selector,
    layout: Layout,
}

impl RecordSchema {
    /// Listing schema; cells in column order.
    pub fn rows(name: &'static str, fields: &[Field], cells: Selector) -> Self {
        Self {
            name,
            fields: fields.to_vec(),
            cells,
            layout: Layout::Rows { class: None, positioning: Positioning::Cyclic },
        }
    }

    /// Only count cells whose `class` attribute is exactly `class`.
    pub fn with_class(mut self, class: &'static str) -> Self {
        if let Layout::Rows { class: c, .. } = &mut self.layout {
            *c = Some(class);
        }
        self
    }

    pub fn by_sibling_index(mut self) -> Self {
        if let Layout::Rows { positioning, .. } = &mut self.layout {
            *positioning = Positioning::Sibling;
        }
        self
    }

    /// Detail schema; `captions` maps the page's caption text to a field name.
    pub fn title_value(
        name: &'static str,
        fields: &[Field],
        cells: Selector,
        captions: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { name, fields: fields.to_vec(), cells, layout: Layout::TitleValue { captions } }
    }

    pub fn name(&self) -> &'static str { self.name }

    pub fn width(&self) -> usize { self.fields.len() }

    pub fn fields(&self) -> &[Field] { &self.fields }

    fn field(&self, name: &str) -> Option<Field> {
        self.fields.iter().copied().find(|f| f.name == name)
    }
}

/// One decoded cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Value {
    pub text: String,
    pub href: Option<String>,
    pub ratio: Option<Ratio>,
}

impl Value {
    fn decode(cell: ElementRef<'_>, rule: Rule) -> Self {
        let text = text_of(cell);
        match rule {
            Rule::Text => Value { text, ..Value::default() },
            Rule::TextWithLink => Value { href: first_href(cell), text, ratio: None },
            Rule::Ratio => Value { ratio: parse_ratio(&text), text, href: None },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    schema: &'static str,
    values: BTreeMap<&'static str, Value>,
}

impl Record {
    fn new(schema: &'static str) -> Self {
        Self { schema, values: BTreeMap::new() }
    }

    fn set(&mut self, field: Field, cell: ElementRef<'_>) {
        self.values.insert(field.name, Value::decode(cell, field.rule));
    }

    pub fn get(&self, name: &str) -> Option<&Value> { self.values.get(name) }

    pub fn has(&self, name: &str) -> bool { self.values.contains_key(name) }

    /// Text of a field; empty when the page did not show it.
    pub fn text(&self, name: &str) -> String {
        self.values.get(name).map(|v| v.text.clone()).unwrap_or_default()
    }

    pub fn href(&self, name: &str) -> Option<String> {
        self.values.get(name).and_then(|v| v.href.clone())
    }

    /// Parsed ratio; a present but unparsable cell is a structural error.
    pub fn ratio(&self, name: &str) -> Result<Option<Ratio>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value { ratio: Some(r), .. }) => Ok(Some(*r)),
            Some(v) => Err(PortalError::structural(
                self.schema,
                format!("{name}: cannot read utilisation from {:?}", v.text),
            )),
        }
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

/// Typed view over a [`Record`].
pub trait FromRecord: Sized {
    fn from_record(r: &Record) -> Result<Self>;
}

pub fn extract<'a>(doc: &'a Html, schema: &'a RecordSchema) -> Records<'a> {
    let cells = doc.select(&schema.cells);
    let inner = match schema.layout {
        Layout::Rows { class, positioning } => Inner::Rows {
            cells,
            class,
            positioning,
            pos: 0,
            completed: 0,
            current: Record::new(schema.name),
        },
        Layout::TitleValue { captions } => Inner::TitleValue { cells: Some(cells), captions },
    };
    Records { schema, inner }
}

/// Convert every record; the first conversion error fails the whole page.
pub fn extract_as<T: FromRecord>(doc: &Html, schema: &RecordSchema) -> Result<Vec<T>> {
    extract(doc, schema).map(|r| T::from_record(&r)).collect()
}

pub struct Records<'a> {
    schema: &'a RecordSchema,
    inner: Inner<'a>,
}

enum Inner<'a> {
    Rows {
        cells: Select<'a, 'a>,
        class: Option<&'static str>,
        positioning: Positioning,
        pos: usize,
        completed: usize,
        current: Record,
    },
    TitleValue {
        cells: Option<Select<'a, 'a>>,
        captions: &'static [(&'static str, &'static str)],
    },
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let schema = self.schema;
        let width = schema.width();
        match &mut self.inner {
            Inner::Rows { cells, class, positioning, pos, completed, current } => {
                if width == 0 {
                    return None;
                }
                for cell in cells.by_ref() {
                    if class.is_some_and(|c| !has_class_exact(cell, c)) {
                        continue;
                    }
                    let column = match positioning {
                        Positioning::Cyclic => {
                            let c = *pos % width;
                            *pos += 1;
                            c
                        }
                        Positioning::Sibling => sibling_index(cell),
                    };
                    let Some(field) = schema.fields.get(column).copied() else { continue };
                    current.set(field, cell);

                    if column == width - 1 {
                        *completed += 1;
                        let done = std::mem::replace(current, Record::new(schema.name));
                        // first group is the repeated header
                        if *completed > 1 {
                            return Some(done);
                        }
                    }
                }
                None
            }
            Inner::TitleValue { cells, captions } => {
                let cells: Vec<ElementRef<'_>> = cells.take()?.collect();
                let mut record = Record::new(schema.name);
                for pair in cells.chunks_exact(2) {
                    let caption = text_of(pair[0]);
                    let Some(&(_, name)) = captions.iter().find(|(c, _)| *c == caption) else { continue };
                    if let Some(field) = schema.field(name) {
                        record.set(field, pair[1]);
                    }
                }
                Some(record)
            }
        }
    }
}
