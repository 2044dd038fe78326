use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automatons are built only once, thread-safe
static ATTRIBUTE_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML attribute escaper")
});

static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

/// Escape XML special characters for use inside an attribute value.
///
/// # Examples
///
/// ```
/// use odfgen::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    ATTRIBUTE_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Escape character data. Quotes are left alone since they are legal in text nodes.
///
/// # Examples
///
/// ```
/// use odfgen::common::xml::escape_text;
/// assert_eq!(escape_text("\"a\" < b"), "\"a\" &lt; b");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Append the escaped form of `s` to `out`, skipping the replacement pass when
/// nothing needs escaping.
#[inline]
pub fn push_escaped(out: &mut String, s: &str, attribute: bool) {
    let escaper = if attribute {
        &*ATTRIBUTE_ESCAPER
    } else {
        &*TEXT_ESCAPER
    };
    if escaper.is_match(s) {
        let replacements: &[&str] = if attribute {
            &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]
        } else {
            &["&amp;", "&lt;", "&gt;"]
        };
        escaper.replace_all_with(s, out, |mat, _, dst| {
            dst.push_str(replacements[mat.pattern().as_usize()]);
            true
        });
    } else {
        out.push_str(s);
    }
}
