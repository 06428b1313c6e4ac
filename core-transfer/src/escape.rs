//! URL escaping for path components.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters percent-encoded when a path segment is embedded in a URL.
///
/// Everything a URL path segment cannot carry verbatim, including the
/// segment separator itself.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'{')
    .add(b'}')
    .add(b'^')
    .add(b'[')
    .add(b']')
    .add(b'|');

/// Percent-encode one path segment for safe inclusion in a URL.
///
/// Pure function; already-encoded input is encoded again (`%` is escaped).
pub fn escape_path_component_for_url(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
