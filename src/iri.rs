//! IRI-related helpers.
//!
//! The rewrite core never parses IRIs into components (scheme, authority, path); it
//! only needs to recognize the *shape* of an absolute IRI and split `prefix:suffix`
//! pairs. See `spec.md` §4.1 and §6 for the two regular expressions this module
//! implements without pulling in a full IRI/URL parser.

/// Split the given string into a `prefix:suffix` pair at the first colon.
pub(crate) fn to_prefix_and_suffix(s: &str) -> Option<(&str, &str)> {
    s.find(':')
        .map(|colon_pos| (&s[..colon_pos], &s[(colon_pos + 1)..]))
}

/// Checks whether `s` has the form of an absolute IRI: `\w+://\S+`.
///
/// See `spec.md` §6 "IRI patterns".
pub(crate) fn is_absolute_iri(s: &str) -> bool {
    let (scheme, rest) = match to_prefix_and_suffix(s) {
        Some(parts) => parts,
        None => return false,
    };
    !scheme.is_empty()
        && scheme.bytes().all(is_word_byte)
        && rest.starts_with("//")
        && rest.len() > 2
        && rest[2..].bytes().all(|b| !b.is_ascii_whitespace())
}

/// Checks whether `s` has the form of a fetchable URL: `(http|https)://\S+`.
///
/// See `spec.md` §6 "IRI patterns" and §4.3 "Fetch phase".
pub(crate) fn is_fetchable_url(s: &str) -> bool {
    let (scheme, rest) = match to_prefix_and_suffix(s) {
        Some(parts) => parts,
        None => return false,
    };
    (scheme == "http" || scheme == "https")
        && rest.starts_with("//")
        && rest.len() > 2
        && rest[2..].bytes().all(|b| !b.is_ascii_whitespace())
}

/// `\w` in the JSON-LD spec's regex flavor: ASCII letters, digits, and underscore.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_absolute_iris() {
        assert!(is_absolute_iri("http://example.com/foo"));
        assert!(is_absolute_iri("urn:isbn:0-486-27557-4".replace(':', "://").as_str()));
        assert!(!is_absolute_iri("foo:bar"));
        assert!(!is_absolute_iri("plain"));
        assert!(!is_absolute_iri("foo bar://baz"));
    }

    #[test]
    fn recognizes_fetchable_urls() {
        assert!(is_fetchable_url("http://example.com/ctx.jsonld"));
        assert!(is_fetchable_url("https://example.com/ctx.jsonld"));
        assert!(!is_fetchable_url("ftp://example.com/ctx.jsonld"));
        assert!(!is_fetchable_url("example.com/ctx.jsonld"));
    }

    #[test]
    fn splits_prefix_and_suffix() {
        assert_eq!(to_prefix_and_suffix("foaf:name"), Some(("foaf", "name")));
        assert_eq!(to_prefix_and_suffix("noprefix"), None);
    }
}
