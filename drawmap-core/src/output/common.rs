//! Escaping helpers shared by the serialisers

/// Escapes text for inclusion in HTML markup (element text or a quoted attribute)
///
/// ```
/// use drawmap_core::output::common::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes text for a double-quoted XML attribute value
///
/// Line breaks and tabs are written as character references so that XML attribute
/// normalisation does not turn them into spaces.
///
/// ```
/// use drawmap_core::output::common::escape_xml_attr;
///
/// assert_eq!(escape_xml_attr("a<b>\"c\"\nd"), "a&lt;b&gt;&quot;c&quot;&#10;d");
/// ```
pub fn escape_xml_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
    out
}
