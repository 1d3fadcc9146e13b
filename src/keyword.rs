//! The closed keyword set and the keyword-alias table.

use std::collections::HashMap;

/// A reserved `@`-prefixed control key understood by the rewrite core.
///
/// See `spec.md` §3 "Keyword".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `@context`.
    Context,
    /// `@id`.
    Id,
    /// `@type`.
    Type,
    /// `@value`.
    Value,
    /// `@language`.
    Language,
    /// `@list`.
    List,
    /// `@set`.
    Set,
    /// `@graph`.
    Graph,
    /// `@container`.
    Container,
}

impl Keyword {
    /// All keywords, in no particular order.
    pub const ALL: [Keyword; 9] = [
        Keyword::Context,
        Keyword::Id,
        Keyword::Type,
        Keyword::Value,
        Keyword::Language,
        Keyword::List,
        Keyword::Set,
        Keyword::Graph,
        Keyword::Container,
    ];

    /// Returns the canonical `@`-prefixed string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Context => "@context",
            Self::Id => "@id",
            Self::Type => "@type",
            Self::Value => "@value",
            Self::Language => "@language",
            Self::List => "@list",
            Self::Set => "@set",
            Self::Graph => "@graph",
            Self::Container => "@container",
        }
    }

    /// Parses a keyword from its canonical string form.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// Framing keywords preserved verbatim through expansion but not otherwise interpreted
/// by the core (`spec.md` §3 "Keyword").
pub const FRAMING_KEYWORDS: [&str; 4] = ["@embed", "@explicit", "@default", "@omitDefault"];

/// Bidirectional table mapping every built-in [`Keyword`] to the user-chosen alias that
/// stands for it in a particular context, and back.
///
/// Starts as the identity mapping; a context entry whose value is a string equal to a
/// built-in keyword registers `keyword -> user_key`, overriding identity.
///
/// See `spec.md` §4.1 "Keyword alias table".
#[derive(Debug, Clone)]
pub(crate) struct KeywordAliases {
    /// keyword -> alias used when compacting.
    alias_of: HashMap<Keyword, String>,
    /// alias used in a document -> keyword it stands for, used when expanding.
    keyword_of: HashMap<String, Keyword>,
}

impl Default for KeywordAliases {
    fn default() -> Self {
        let mut alias_of = HashMap::new();
        let mut keyword_of = HashMap::new();
        for kw in Keyword::ALL {
            alias_of.insert(kw, kw.as_str().to_string());
            keyword_of.insert(kw.as_str().to_string(), kw);
        }
        Self {
            alias_of,
            keyword_of,
        }
    }
}

impl KeywordAliases {
    /// Registers `alias` as standing for `keyword`, overriding the identity default.
    pub(crate) fn set_alias(&mut self, keyword: Keyword, alias: impl Into<String>) {
        let alias = alias.into();
        self.keyword_of.insert(alias.clone(), keyword);
        self.alias_of.insert(keyword, alias);
    }

    /// Returns the alias a context uses for `keyword` (itself, unless overridden).
    pub(crate) fn alias_of(&self, keyword: Keyword) -> &str {
        self.alias_of
            .get(&keyword)
            .map(String::as_str)
            .unwrap_or_else(|| keyword.as_str())
    }

    /// Returns the keyword that `key` was defined as an alias for, if any.
    pub(crate) fn keyword_of(&self, key: &str) -> Option<Keyword> {
        self.keyword_of.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_aliases_are_identity() {
        let aliases = KeywordAliases::default();
        assert_eq!(aliases.alias_of(Keyword::Id), "@id");
        assert_eq!(aliases.keyword_of("@id"), Some(Keyword::Id));
    }

    #[test]
    fn user_alias_overrides_identity_both_ways() {
        let mut aliases = KeywordAliases::default();
        aliases.set_alias(Keyword::Id, "id");
        assert_eq!(aliases.alias_of(Keyword::Id), "id");
        assert_eq!(aliases.keyword_of("id"), Some(Keyword::Id));
        assert_eq!(aliases.keyword_of("@id"), Some(Keyword::Id));
    }
}
