//! Namespace declarations written on every root element.
//!
//! The output vocabulary is closed, so the generator declares one fixed set
//! of prefixes on each stream root instead of tracking which ones are used.

use phf::{Map, phf_map};

pub const OFFICENS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
pub const MANIFESTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";

/// Prefix/URI pairs in declaration order
pub const DOCUMENT_NAMESPACES: &[(&str, &str)] = &[
    ("office", OFFICENS),
    ("meta", "urn:oasis:names:tc:opendocument:xmlns:meta:1.0"),
    ("config", "urn:oasis:names:tc:opendocument:xmlns:config:1.0"),
    ("text", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
    ("table", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
    ("draw", "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"),
    ("fo", "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"),
    ("xlink", "http://www.w3.org/1999/xlink"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("number", "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0"),
    ("svg", "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0"),
    ("chart", "urn:oasis:names:tc:opendocument:xmlns:chart:1.0"),
    ("dr3d", "urn:oasis:names:tc:opendocument:xmlns:dr3d:1.0"),
    ("math", "http://www.w3.org/1998/Math/MathML"),
    ("form", "urn:oasis:names:tc:opendocument:xmlns:form:1.0"),
    ("script", "urn:oasis:names:tc:opendocument:xmlns:script:1.0"),
    ("presentation", "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0"),
    ("smil", "urn:oasis:names:tc:opendocument:xmlns:smil-compatible:1.0"),
    ("style", "urn:oasis:names:tc:opendocument:xmlns:style:1.0"),
    ("of", "urn:oasis:names:tc:opendocument:xmlns:of:1.2"),
    ("calcext", "urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0"),
    ("loext", "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0"),
];

static PREFIX_TO_URI: Map<&'static str, &'static str> = phf_map! {
    "office" => "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
    "meta" => "urn:oasis:names:tc:opendocument:xmlns:meta:1.0",
    "config" => "urn:oasis:names:tc:opendocument:xmlns:config:1.0",
    "text" => "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
    "table" => "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
    "draw" => "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
    "fo" => "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
    "xlink" => "http://www.w3.org/1999/xlink",
    "dc" => "http://purl.org/dc/elements/1.1/",
    "number" => "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0",
    "svg" => "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
    "chart" => "urn:oasis:names:tc:opendocument:xmlns:chart:1.0",
    "dr3d" => "urn:oasis:names:tc:opendocument:xmlns:dr3d:1.0",
    "math" => "http://www.w3.org/1998/Math/MathML",
    "form" => "urn:oasis:names:tc:opendocument:xmlns:form:1.0",
    "script" => "urn:oasis:names:tc:opendocument:xmlns:script:1.0",
    "presentation" => "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0",
    "smil" => "urn:oasis:names:tc:opendocument:xmlns:smil-compatible:1.0",
    "style" => "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
    "of" => "urn:oasis:names:tc:opendocument:xmlns:of:1.2",
    "calcext" => "urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0",
    "loext" => "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0",
    "manifest" => "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0",
    "xml" => "http://www.w3.org/XML/1998/namespace",
};

/// Resolve a known prefix to its namespace URI
#[inline]
pub fn namespace_uri(prefix: &str) -> Option<&'static str> {
    PREFIX_TO_URI.get(prefix).copied()
}

/// Split `prefix:local` into its prefix, if any
#[inline]
pub fn prefix_of(qualified_name: &str) -> Option<&str> {
    qualified_name.split_once(':').map(|(prefix, _)| prefix)
}

/// `true` if the element or attribute name uses a prefix the generator declares
pub fn is_known_name(qualified_name: &str) -> bool {
    match prefix_of(qualified_name) {
        Some("xmlns") => true,
        Some(prefix) => namespace_uri(prefix).is_some(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_prefix_resolves() {
        for (prefix, uri) in DOCUMENT_NAMESPACES {
            assert_eq!(namespace_uri(prefix), Some(*uri));
        }
    }

    #[test]
    fn test_known_names() {
        assert!(is_known_name("text:p"));
        assert!(is_known_name("xmlns:style"));
        assert!(!is_known_name("foo:bar"));
        assert!(!is_known_name("plain"));
    }
}
