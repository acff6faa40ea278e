//! Validating Form Binder
//!
//! Maps flat, dot-prefixed form fields (`cardcontact.firstname`,
//! `card.cardtypeid`) onto domain objects. Conversion failures and
//! business-rule failures are collected into one [`ValidationError`]
//! whose message can be shown next to the form.

mod shop;

use std::collections::BTreeMap;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Submitted form fields. Keys are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. A repeated key joins its values with a comma, which is
    /// how checkbox/hidden pairs arrive (`true,false`).
    pub fn insert(&mut self, key: &str, value: &str) {
        self.fields
            .entry(key.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields under `prefix.`, with the prefix stripped
    pub fn section<'a>(&'a self, prefix: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let prefix = format!("{}.", prefix.to_lowercase());
        self.fields.iter().filter_map(move |(key, value)| {
            key.strip_prefix(prefix.as_str())
                .map(|field| (field, value.as_str()))
        })
    }

    /// Decode an `application/x-www-form-urlencoded` body
    pub fn parse_urlencoded(body: &str) -> Self {
        let mut form = FormData::new();
        for pair in body.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            form.insert(&decode_component(key), &decode_component(value));
        }
        form
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (key, value) in iter {
            form.insert(key.as_ref(), value.as_ref());
        }
        form
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// One or more fields failed conversion or validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("\n"))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// Merge the failures of several binding steps
    pub fn combine<I>(results: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Result<(), ValidationError>>,
    {
        let messages: Vec<String> = results
            .into_iter()
            .filter_map(Result::err)
            .flat_map(|err| err.messages)
            .collect();
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { messages })
        }
    }
}

/// A domain object that can be filled from form fields
pub trait Bindable {
    /// Assign one field, named in lower case without its prefix.
    /// Fields the type does not know are ignored.
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), String>;

    /// Business rules checked once every field has been bound
    fn validate(&self) -> Vec<String> {
        Vec::new()
    }
}

pub struct ValidatingBinder;

impl ValidatingBinder {
    /// Bind every `prefix.*` field of `form` onto `target`
    pub fn update_from<T: Bindable>(
        target: &mut T,
        form: &FormData,
        prefix: &str,
    ) -> Result<(), ValidationError> {
        let mut messages = Vec::new();
        for (field, value) in form.section(prefix) {
            if let Err(message) = target.bind_field(field, value) {
                messages.push(message);
            }
        }
        messages.extend(target.validate());

        if messages.is_empty() {
            Ok(())
        } else {
            log::debug!("Binding '{}' failed: {:?}", prefix, messages);
            Err(ValidationError { messages })
        }
    }
}

pub(crate) fn parse_number<N: FromStr>(label: &str, value: &str) -> Result<N, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid value for {}", value, label))
}

/// Empty input binds to None
pub(crate) fn parse_optional_number<N: FromStr>(label: &str, value: &str) -> Result<Option<N>, String> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_number(label, value).map(Some)
    }
}

pub(crate) fn parse_bool(label: &str, value: &str) -> Result<bool, String> {
    // Checkbox + hidden field posts "true,false"; the first value wins
    let first = value.split(',').next().unwrap_or("").trim();
    if first.eq_ignore_ascii_case("true") || first.eq_ignore_ascii_case("on") {
        Ok(true)
    } else if first.eq_ignore_ascii_case("false") || first.is_empty() {
        Ok(false)
    } else {
        Err(format!("'{}' is not a valid value for {}", value, label))
    }
}

pub(crate) fn require(messages: &mut Vec<String>, label: &str, value: &str) {
    if value.trim().is_empty() {
        messages.push(format!("You must enter a value for {}", label));
    }
}
