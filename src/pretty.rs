//! Pretty printing of record responses.

use crate::client::Response;
use crate::error::{Result, UnapiError};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde_json::Value;

/// Indent JSON by two spaces. Non-ASCII characters are written as is.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn pretty_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Re-indent an XML document by two spaces.
///
/// Whitespace between elements is dropped before indenting.
///
/// # Errors
///
/// Returns an error if `xml` is not well-formed.
pub fn pretty_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => writer
                .write_event(event)
                .map_err(|e| UnapiError::Xml(e.to_string()))?,
            Err(e) => {
                return Err(UnapiError::Xml(format!(
                    "Malformed XML at position {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| UnapiError::Xml(e.to_string()))
}

/// Render a response for display.
///
/// # Errors
///
/// Returns an error if a JSON or XML body cannot be re-formatted.
pub fn pretty_response(response: &Response) -> Result<String> {
    match response {
        Response::Json(value) => pretty_json(value),
        Response::Xml(xml) => pretty_xml(xml),
        Response::Text(text) => Ok(text.clone()),
    }
}
