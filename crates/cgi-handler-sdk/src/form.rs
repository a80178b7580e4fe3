//! `application/x-www-form-urlencoded` body parsing
//!
//! Parsing is strict about encoding: a `%` that is not followed by two hex
//! digits, or a name/value that does not decode to UTF-8, is an error rather
//! than being passed through. Structural oddities (empty segments, segments
//! without `=`, blank values) are skipped the way browsers' form parsers
//! skip them.

use std::borrow::Cow;

use percent_encoding::percent_decode;
use thiserror::Error;

/// Media type of URL-encoded form bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Failure to parse a URL-encoded body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("body is not valid UTF-8: {0}")]
    InvalidBody(#[from] std::str::Utf8Error),

    #[error("malformed percent-encoding {sequence:?} at byte {offset}")]
    MalformedEscape { sequence: String, offset: usize },

    #[error("decoded component {0:?} is not valid UTF-8")]
    InvalidUtf8(String),
}

/// Form fields in order of first occurrence; repeated names keep every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, Vec<String>)>,
}

impl FormFields {
    /// Parse a URL-encoded body.
    ///
    /// # Example
    /// ```
    /// use cgi_handler_sdk::form::FormFields;
    ///
    /// let form = FormFields::parse(b"a=1&b=2&b=3").unwrap();
    /// assert_eq!(form.get("a"), Some("1"));
    /// assert_eq!(form.get_all("b"), &["2", "3"]);
    /// ```
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let text = std::str::from_utf8(body)?;
        let mut form = FormFields::default();

        let mut offset = 0;
        for segment in text.split('&') {
            let start = offset;
            offset += segment.len() + 1;

            let Some((raw_name, raw_value)) = segment.split_once('=') else {
                continue;
            };
            if raw_value.is_empty() {
                continue;
            }

            let name = decode_component(raw_name, start)?;
            let value = decode_component(raw_value, start + raw_name.len() + 1)?;
            form.push(name, value);
        }

        Ok(form)
    }

    fn push(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((name, vec![value])),
        }
    }

    /// First value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Every value of a field, in submission order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Fields in order of first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Every `(name, value)` pair, grouped by field.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v.as_str())))
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decode one name or value. `base` is the component's byte offset in the body.
fn decode_component(raw: &str, base: usize) -> Result<String, FormError> {
    check_escapes(raw.as_bytes(), base)?;

    let plus_as_space = raw.replace('+', " ");
    percent_decode(plus_as_space.as_bytes())
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| {
            FormError::InvalidUtf8(
                percent_decode(plus_as_space.as_bytes())
                    .decode_utf8_lossy()
                    .into_owned(),
            )
        })
}

/// Reject any `%` that is not followed by two hex digits.
fn check_escapes(bytes: &[u8], base: usize) -> Result<(), FormError> {
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            let end = (i + 3).min(bytes.len());
            return Err(FormError::MalformedEscape {
                sequence: String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                offset: base + i,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_fields_keep_order() {
        let form = FormFields::parse(b"a=1&b=2&b=3").unwrap();
        let pairs: Vec<_> = form.pairs().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2"), ("b", "3")]);
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_field_order_is_first_occurrence() {
        let form = FormFields::parse(b"z=1&a=2&z=3").unwrap();
        let names: Vec<_> = form.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(form.get_all("z"), &["1", "3"]);
    }

    #[test]
    fn test_decodes_plus_and_percent() {
        let form = FormFields::parse(b"full+name=Ada%20Lovelace&sym=%26%3d%2B&utf=%C3%A9").unwrap();
        assert_eq!(form.get("full name"), Some("Ada Lovelace"));
        assert_eq!(form.get("sym"), Some("&=+"));
        assert_eq!(form.get("utf"), Some("é"));
    }

    #[test]
    fn test_splits_on_first_equals() {
        let form = FormFields::parse(b"expr=a=b").unwrap();
        assert_eq!(form.get("expr"), Some("a=b"));
    }

    #[test]
    fn test_skips_blank_and_bare_segments() {
        let form = FormFields::parse(b"&empty=&flag&&x=1&").unwrap();
        let pairs: Vec<_> = form.pairs().collect();
        assert_eq!(pairs, vec![("x", "1")]);
    }

    #[test]
    fn test_empty_body() {
        let form = FormFields::parse(b"").unwrap();
        assert!(form.is_empty());
        assert_eq!(form.get("a"), None);
        assert!(form.get_all("a").is_empty());
    }

    #[test]
    fn test_malformed_escape_reports_offset() {
        let err = FormFields::parse(b"ok=1&a=%zz").unwrap_err();
        assert_eq!(
            err,
            FormError::MalformedEscape {
                sequence: "%zz".to_string(),
                offset: 7,
            }
        );
        assert_eq!(err.to_string(), "malformed percent-encoding \"%zz\" at byte 7");
    }

    #[test]
    fn test_truncated_escape() {
        let err = FormFields::parse(b"a=1%4").unwrap_err();
        assert_eq!(
            err,
            FormError::MalformedEscape {
                sequence: "%4".to_string(),
                offset: 3,
            }
        );

        let err = FormFields::parse(b"a%=1").unwrap_err();
        assert!(matches!(err, FormError::MalformedEscape { offset: 1, .. }));
    }

    #[test]
    fn test_invalid_utf8_after_decoding() {
        let err = FormFields::parse(b"a=%FF").unwrap_err();
        assert!(matches!(err, FormError::InvalidUtf8(_)));
    }

    #[test]
    fn test_invalid_utf8_body() {
        let err = FormFields::parse(&[b'a', b'=', 0xC3]).unwrap_err();
        assert!(matches!(err, FormError::InvalidBody(_)));
    }

    #[test]
    fn test_escape_followed_by_multibyte_char() {
        let err = FormFields::parse("a=%é1".as_bytes()).unwrap_err();
        assert!(matches!(err, FormError::MalformedEscape { offset: 2, .. }));
    }

    #[test]
    fn test_encoded_plus_is_not_a_space() {
        let form = FormFields::parse(b"q=1%2B1+%3D+2").unwrap();
        assert_eq!(form.get("q"), Some("1+1 = 2"));
    }

    #[test]
    fn test_bare_name_only() {
        assert!(FormFields::parse(b"flag").unwrap().is_empty());
    }

    #[test]
    fn test_blank_value_skips_decoding() {
        // the name is never decoded when the value is blank
        let form = FormFields::parse(b"%zz=&a=1").unwrap();
        assert_eq!(form.get("a"), Some("1"));
    }
}
