use std::slice;

use crate::protocol::header::{HeaderField, HeaderKey};
use crate::protocol::media_type::MediaType;
use crate::protocol::ParseError;

/// An ordered list of header fields.
///
/// Fields keep the order they were appended in. Repeated names are never merged:
/// two `Set-Cookie` lines stay two fields, and [`HeaderBlock::get`] returns both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    fields: Vec<HeaderField>,
}

impl HeaderBlock {
    /// Empty list of headers.
    pub const EMPTY: HeaderBlock = HeaderBlock { fields: Vec::new() };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { fields: Vec::with_capacity(capacity) }
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if this is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a new `field`.
    ///
    /// # Notes
    ///
    /// This doesn't check for duplicate names, it just adds the field to the end of
    /// the list.
    pub fn append(&mut self, field: HeaderField) {
        self.fields.push(field);
    }

    /// Builds and appends a field from a key and value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeaderField`] if the value contains CR, LF or NUL.
    pub fn append_value<V: Into<String>>(&mut self, key: HeaderKey, value: V) -> Result<(), ParseError> {
        self.append(HeaderField::new(key, value)?);
        Ok(())
    }

    /// All values for `key`, in the order they appeared.
    pub fn get<'a>(&'a self, key: &'a HeaderKey) -> impl Iterator<Item = &'a str> + 'a {
        self.fields.iter().filter(move |field| field.key() == key).map(HeaderField::value)
    }

    /// All values for the header named `name`, ignoring case.
    pub fn get_str<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields.iter().filter(move |field| *field.key() == *name).map(HeaderField::value)
    }

    /// The first value for `key`, if any.
    pub fn get_first(&self, key: &HeaderKey) -> Option<&str> {
        self.get_first_field(key).map(HeaderField::value)
    }

    /// The first field for `key`, if any.
    pub fn get_first_field(&self, key: &HeaderKey) -> Option<&HeaderField> {
        self.fields.iter().find(|field| field.key() == key)
    }

    pub fn contains(&self, key: &HeaderKey) -> bool {
        self.get_first_field(key).is_some()
    }

    /// The first `Content-Type` field parsed as a media type.
    ///
    /// Returns `Ok(None)` when there is no such header. The parse happens on first
    /// access and is cached in the field.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedMediaType`] if the value is not a media type.
    pub fn content_type(&self) -> Result<Option<&MediaType>, ParseError> {
        self.get_first_field(&HeaderKey::CONTENT_TYPE).map(HeaderField::media_type).transpose()
    }

    /// Returns true if a `Connection` header lists `option`, ignoring case.
    pub(crate) fn has_connection_option(&self, option: &str) -> bool {
        self.get(&HeaderKey::CONNECTION).flat_map(|value| value.split(',')).any(|token| token.trim().eq_ignore_ascii_case(option))
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut HeaderField> {
        self.fields.last_mut()
    }

    /// Returns an iterator over all fields in order.
    pub fn iter(&self) -> slice::Iter<'_, HeaderField> {
        self.fields.iter()
    }

    /// Converts into an `http::HeaderMap`.
    ///
    /// Repeated names are kept, but the map groups values by name so the relative
    /// order of different names is lost.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not accepted by `http::HeaderValue`.
    pub fn to_header_map(&self) -> Result<http::HeaderMap, http::Error> {
        let mut map = http::HeaderMap::with_capacity(self.len());
        for field in self {
            let name = http::HeaderName::try_from(field.key())?;
            let value = http::HeaderValue::from_str(field.value())?;
            map.append(name, value);
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a HeaderBlock {
    type Item = &'a HeaderField;
    type IntoIter = slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for HeaderBlock {
    type Item = HeaderField;
    type IntoIter = std::vec::IntoIter<HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<HeaderField> for HeaderBlock {
    fn from_iter<I: IntoIterator<Item = HeaderField>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

impl Extend<HeaderField> for HeaderBlock {
    fn extend<I: IntoIterator<Item = HeaderField>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}
