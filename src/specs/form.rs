// src/specs/form.rs
//! Hidden-field extraction and the fixed-format body builder.
//!
//! The portal tracks workflow position with Struts hidden fields
//! (`TOKEN`, `destdisp`, `aplyid`, `prevDispId`). A form that is not where
//! we expect it is the first sign of an error page or an expired session,
//! so a miss is reported as a structural error.
//!
//! Bodies are *not* URL-encoded. Values go out as given, including
//! pre-encoded Shift_JIS captions like `%90%5C%90%BF`, and the whole body
//! is transcoded once by `core::encoding`. Re-encoding would break them.

use std::sync::LazyLock;

use scraper::{ ElementRef, Html, Selector };

use crate::core::html::{ sel, title };
use crate::error::{ PortalError, Result };

/// Ordered `name=value` pairs. Order is kept exactly as pushed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSubmission {
    fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] { &self.fields }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// `a=1&b=2`, verbatim.
    pub fn to_body(&self) -> String {
        let mut out = String::new();
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 { out.push('&'); }
            out.push_str(name);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Parse `key=value` lines (transaction files). Blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Result<Self> {
        let mut f = Self::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') { continue; }
            let (k, v) = line.split_once('=').ok_or_else(|| {
                PortalError::Config(format!("line {}: expected key=value", n + 1))
            })?;
            f.push(k.trim(), v);
        }
        Ok(f)
    }
}

/// What a page's form hands us for the next submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSeed {
    pub action: String,
    pub hidden: FormSubmission,
    first_input: Option<String>,
}

impl FormSeed {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.hidden.get(name)
    }

    /// Hidden value, or empty when the form did not carry it.
    pub fn value_or_empty(&self, name: &str) -> String {
        self.value(name).map(str::to_string).unwrap_or_default()
    }

    /// Value of the first `<input>` of the form, whatever its type.
    pub fn first_input_value(&self) -> Option<&str> {
        self.first_input.as_deref()
    }
}

static FORM: LazyLock<Selector> = LazyLock::new(|| sel("form"));
static INPUT: LazyLock<Selector> = LazyLock::new(|| sel("input"));

/// First form whose `action` satisfies `accept`.
pub fn extract(doc: &Html, accept: impl Fn(&str) -> bool) -> Result<FormSeed> {
    let form = doc
        .select(&FORM)
        .find(|f| f.value().attr("action").is_some_and(&accept))
        .ok_or_else(|| no_form(doc))?;
    Ok(seed(doc, form))
}

/// Last form whose `action` satisfies `accept`. Listing pages put their
/// search form after any navigation forms.
pub fn extract_last(doc: &Html, accept: impl Fn(&str) -> bool) -> Result<FormSeed> {
    let form = doc
        .select(&FORM)
        .filter(|f| f.value().attr("action").is_some_and(&accept))
        .last()
        .ok_or_else(|| no_form(doc))?;
    Ok(seed(doc, form))
}

fn no_form(doc: &Html) -> PortalError {
    let page = title(doc).unwrap_or_else(|| s!("untitled page"));
    PortalError::structural(page, "no matching form on page")
}

fn seed(doc: &Html, form: ElementRef<'_>) -> FormSeed {
    let action = form.value().attr("action").unwrap_or_default().to_string();
    let first_input = form
        .select(&INPUT)
        .next()
        .and_then(|i| i.value().attr("value"))
        .map(str::to_string);

    let mut hidden = FormSubmission::new();
    for input in form.select(&INPUT).chain(doc.select(&INPUT)) {
        if let Some((name, value)) = hidden_pair(input) {
            if hidden.get(name).is_none() {
                hidden.push(name, value);
            }
        }
    }

    FormSeed { action, hidden, first_input }
}

fn hidden_pair(input: ElementRef<'_>) -> Option<(&str, &str)> {
    let el = input.value();
    if !el.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")) {
        return None;
    }
    Some((el.attr("name")?, el.attr("value").unwrap_or("")))
}

/// Value of a named `<input>` found under `scope`.
pub fn input_value(doc: &Html, scope: &Selector, name: &str) -> Option<String> {
    doc.select(scope)
        .filter(|i| i.value().attr("name") == Some(name))
        .find_map(|i| i.value().attr("value"))
        .map(str::to_string)
}

/// Checkbox flags travel as `on` or empty.
pub fn flag(b: bool) -> &'static str {
    if b { "on" } else { "" }
}
