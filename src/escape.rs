//! XML escaping at the serialization boundary.
//!
//! Serialization always escapes attribute values and text content. Parsing
//! stays lenient: already-escaped or outright malformed input is accepted
//! as-is and unescaped on a best-effort basis.

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Undo the five predefined entity references.
///
/// `&amp;` is handled last so that double-escaped input collapses by
/// exactly one level per pass.
pub fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Expand a general entity reference name (the part between `&` and `;`)
/// into its replacement text.
///
/// Handles the five predefined entities and decimal/hex character
/// references. Unknown entity names come back as `None`.
pub(crate) fn expand_entity(name: &str) -> Option<String> {
    match name {
        "amp" => Some("&".to_string()),
        "lt" => Some("<".to_string()),
        "gt" => Some(">".to_string()),
        "quot" => Some("\"".to_string()),
        "apos" => Some("'".to_string()),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value).map(|c| c.to_string())
        },
    }
}

/// Append ` name="value"` to `out`, escaping the value.
pub fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_xml(value));
    out.push('"');
}
