//! Context & IRI resolver.
//!
//! See `spec.md` §3 "Context" and §4.1 "Context & IRI Resolver".

use serde_json::{Map as JsonMap, Value};
use tracing::trace;

use crate::{
    error::{Error, ErrorCode, Result},
    iri::to_prefix_and_suffix,
    json::Nullable,
    keyword::{Keyword, KeywordAliases},
};

pub(crate) mod merge;

/// A resolved JSON-LD context: a term-name -> term-definition mapping plus the
/// keyword-alias table derived from it.
///
/// Term definitions are kept in their raw `serde_json::Value` shape (a bare IRI string,
/// or a map carrying `@id`/`@type`/`@container`/`@language`) rather than parsed into a
/// dedicated struct, because `compact_iri` and the merger both need to re-inspect and
/// rewrite the same entries. `IndexMap` preserves declaration order, which
/// `compact_iri`'s "first match wins" tie-break depends on.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: JsonMap<String, Value>,
    aliases: KeywordAliases,
}

impl Context {
    /// The empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from a local context map, without merging it onto anything.
    pub(crate) fn from_map(entries: JsonMap<String, Value>) -> Self {
        let mut aliases = KeywordAliases::default();
        for (key, value) in &entries {
            if let Value::String(s) = value {
                if let Some(kw) = Keyword::parse(s) {
                    aliases.set_alias(kw, key.clone());
                }
            }
        }
        Self { entries, aliases }
    }

    /// Returns the raw term-definition entry for `term`, if any.
    ///
    /// See `spec.md` §4.1 `get(ctx, key) -> entry?`.
    pub(crate) fn get(&self, term: &str) -> Option<&Value> {
        self.entries.get(term)
    }

    /// Returns the bidirectional keyword-alias table.
    ///
    /// See `spec.md` §4.1 `keywords(ctx) -> alias table`.
    pub(crate) fn keywords(&self) -> &KeywordAliases {
        &self.aliases
    }

    /// Returns the raw term-definition map, for re-attaching as a document's `@context`
    /// after compaction.
    pub(crate) fn entries(&self) -> &JsonMap<String, Value> {
        &self.entries
    }

    /// Returns the term's `@id` mapping: the IRI (or prefix IRI) the term resolves to.
    fn term_iri(&self, term: &str) -> Option<&str> {
        match self.entries.get(term)? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get(Keyword::Id.as_str()).and_then(Value::as_str),
            _ => None,
        }
    }

    /// Returns the term's `@type` mapping (an absolute IRI, or the literal `@id`).
    ///
    /// See `spec.md` §4.1 `get(ctx, key, @type) -> value?`.
    pub(crate) fn type_mapping(&self, term: &str) -> Option<&str> {
        match self.entries.get(term)? {
            Value::Object(map) => map.get(Keyword::Type.as_str()).and_then(Value::as_str),
            _ => None,
        }
    }

    /// Returns the term's `@container` mapping (`@list` or `@set`).
    pub(crate) fn container_mapping(&self, term: &str) -> Option<&str> {
        match self.entries.get(term)? {
            Value::Object(map) => map.get(Keyword::Container.as_str()).and_then(Value::as_str),
            _ => None,
        }
    }

    /// Returns the term's `@language` mapping: `Null` if explicitly suppressed, or the
    /// tag otherwise.
    pub(crate) fn language_mapping(&self, term: &str) -> Option<Nullable<&str>> {
        match self.entries.get(term)?.as_object()?.get(Keyword::Language.as_str())? {
            Value::Null => Some(Nullable::Null),
            Value::String(s) => Some(Nullable::Value(s.as_str())),
            _ => None,
        }
    }

    /// Whether `term` has a term definition or is a recognized keyword alias, i.e.
    /// whether it is "defined in the context".
    pub(crate) fn is_defined(&self, term: &str) -> bool {
        self.entries.contains_key(term) || self.aliases.keyword_of(term).is_some()
    }

    /// Expands a term to its absolute IRI (or keyword), per `spec.md` §4.1 "Expansion of
    /// a term".
    ///
    /// Iterates the four-step lookup (`prefix:suffix`, exact term, keyword alias,
    /// unchanged) to a fixed point, failing if the same intermediate value recurs before
    /// stabilizing.
    pub(crate) fn expand_term(&self, term: &str) -> Result<String> {
        let mut current = term.to_string();
        let mut seen = std::collections::HashSet::new();
        loop {
            if !seen.insert(current.clone()) {
                return Err(Error::with_message(
                    ErrorCode::CyclicalContext,
                    format!("term `{}` does not stabilize while expanding `{}`", current, term),
                ));
            }
            let next = self.expand_term_once(&current);
            if next == current {
                trace!(term, expanded = %current, "term expansion stabilized");
                return Ok(current);
            }
            current = next;
        }
    }

    fn expand_term_once(&self, term: &str) -> String {
        if let Some((prefix, suffix)) = to_prefix_and_suffix(term) {
            if let Some(iri) = self.term_iri(prefix) {
                return format!("{}{}", iri, suffix);
            }
        }
        if let Some(iri) = self.term_iri(term) {
            return iri.to_string();
        }
        if let Some(kw) = self.aliases.keyword_of(term) {
            return kw.as_str().to_string();
        }
        term.to_string()
    }

    /// Compacts an absolute IRI to its shortest representation, per `spec.md` §4.1
    /// "Compaction of an IRI": an exact term match, then a keyword alias, then a strict
    /// `prefix:suffix` match, else the IRI unchanged.
    pub(crate) fn compact_iri(&self, iri: &str) -> String {
        for (term, _) in self.entries.iter() {
            if self.term_iri(term) == Some(iri) {
                return term.clone();
            }
        }
        if let Some(kw) = Keyword::parse(iri) {
            return self.aliases.alias_of(kw).to_string();
        }
        for (term, _) in self.entries.iter() {
            if let Some(prefix_iri) = self.term_iri(term) {
                if !prefix_iri.is_empty() && iri.len() > prefix_iri.len() && iri.starts_with(prefix_iri) {
                    return format!("{}:{}", term, &iri[prefix_iri.len()..]);
                }
            }
        }
        iri.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(entries: Value) -> Context {
        Context::from_map(entries.as_object().unwrap().clone())
    }

    #[test]
    fn expands_a_plain_term() {
        let ctx = ctx(json!({"name": "http://example.com/name"}));
        assert_eq!(ctx.expand_term("name").unwrap(), "http://example.com/name");
    }

    #[test]
    fn expands_a_map_valued_term() {
        let ctx = ctx(json!({"knows": {"@id": "http://example.com/knows", "@type": "@id"}}));
        assert_eq!(ctx.expand_term("knows").unwrap(), "http://example.com/knows");
        assert_eq!(ctx.type_mapping("knows"), Some("@id"));
    }

    #[test]
    fn expands_a_prefix_suffix_pair() {
        let ctx = ctx(json!({"foaf": "http://xmlns.com/foaf/0.1/"}));
        assert_eq!(
            ctx.expand_term("foaf:name").unwrap(),
            "http://xmlns.com/foaf/0.1/name"
        );
    }

    #[test]
    fn leaves_unknown_terms_unchanged() {
        let ctx = Context::new();
        assert_eq!(ctx.expand_term("name").unwrap(), "name");
    }

    #[test]
    fn detects_cyclical_term_chains() {
        let ctx = ctx(json!({"a": "b", "b": "a"}));
        let err = ctx.expand_term("a").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CyclicalContext);
    }

    #[test]
    fn registers_keyword_aliases() {
        let ctx = ctx(json!({"id": "@id"}));
        assert_eq!(ctx.expand_term("id").unwrap(), "@id");
        assert_eq!(ctx.keywords().alias_of(Keyword::Id), "id");
    }

    #[test]
    fn compacts_exact_term_matches_before_prefixes() {
        let ctx = ctx(json!({
            "ex": "http://example.com/",
            "name": "http://example.com/name",
        }));
        assert_eq!(ctx.compact_iri("http://example.com/name"), "name");
        assert_eq!(ctx.compact_iri("http://example.com/age"), "ex:age");
    }

    #[test]
    fn compacts_keywords_through_the_alias_table() {
        let ctx = ctx(json!({"id": "@id"}));
        assert_eq!(ctx.compact_iri("@id"), "id");
    }

    #[test]
    fn leaves_unmapped_iris_unchanged() {
        let ctx = Context::new();
        assert_eq!(ctx.compact_iri("http://example.com/x"), "http://example.com/x");
    }
}
