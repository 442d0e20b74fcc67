//! Small helpers over quick-xml shared by the part parsers and writers
//! of both document formats.

use deck_core::{Error, Result};
use quick_xml::events::BytesStart;
use quick_xml::name::QName;

pub const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

pub const NS_DRAWINGML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_PRESENTATIONML: &str =
    "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_OFFICE_RELS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of an unprefixed attribute, unescaped.
pub fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key == QName(key.as_bytes()))
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Value of a namespace-prefixed attribute (such as `r:id`), matched by
/// local name so any prefix is accepted.
pub fn prefixed_attr(e: &BytesStart<'_>, local: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == local.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Escape text for use in element content or attribute values.
pub fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    quick_xml::escape::escape(text)
}

pub fn xml_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::XmlError(format!("{}: {}", context, e))
}

/// Decode a part as UTF-8 text.
pub fn part_text<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::CorruptedPackage(format!("'{}' is not valid UTF-8: {}", name, e)))
}
