//! String matching shared by row-key and string-cell leaves.

use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::PredicateError;

/// How a pattern string is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Whole-value equality.
    Literal,
    /// `*` matches any run of characters, `?` exactly one; whole value.
    Wildcard,
    /// Regular expression; whole value.
    Regex,
}

/// Compiled string test.
///
/// Patterns are compiled once at construction, so a malformed regular
/// expression is reported before any row is read.
#[derive(Clone)]
pub enum StringMatcher {
    /// Case-sensitive equality.
    Exact(String),
    /// Anchored regular expression (also used for wildcards and
    /// case-insensitive literals).
    Pattern(Regex),
}

impl StringMatcher {
    /// Compiles `pattern` according to `mode`.
    pub fn new(
        pattern: &str,
        mode: MatchMode,
        case_sensitive: bool,
    ) -> Result<Self, PredicateError> {
        let source = match mode {
            MatchMode::Literal if case_sensitive => return Ok(Self::Exact(pattern.to_string())),
            MatchMode::Literal => regex::escape(pattern),
            MatchMode::Wildcard => wildcard_to_regex(pattern),
            MatchMode::Regex => pattern.to_string(),
        };
        let regex = RegexBuilder::new(&format!("^(?:{source})$"))
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self::Pattern(regex))
    }

    /// Tests `value` against the compiled pattern.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            StringMatcher::Exact(expected) => expected == value,
            StringMatcher::Pattern(regex) => regex.is_match(value),
        }
    }
}

impl fmt::Debug for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringMatcher::Exact(value) => f.debug_tuple("Exact").field(value).finish(),
            StringMatcher::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
        }
    }
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_respects_case_sensitivity() {
        let insensitive = StringMatcher::new("p*a", MatchMode::Wildcard, false).expect("pattern");
        assert!(insensitive.is_match("Perla"));
        let sensitive = StringMatcher::new("p*a", MatchMode::Wildcard, true).expect("pattern");
        assert!(!sensitive.is_match("Perla"));
        assert!(sensitive.is_match("pizza"));
    }

    #[test]
    fn wildcard_escapes_regex_metacharacters() {
        let matcher = StringMatcher::new("a.b?(c)*", MatchMode::Wildcard, true).expect("pattern");
        assert!(matcher.is_match("a.bx(c)"));
        assert!(matcher.is_match("a.b\n(c) and more"));
        assert!(!matcher.is_match("axbx(c)"));
    }

    #[test]
    fn regex_matches_whole_value() {
        let matcher = StringMatcher::new("ab+", MatchMode::Regex, true).expect("pattern");
        assert!(matcher.is_match("abbb"));
        assert!(!matcher.is_match("xabb"));
        let alternation = StringMatcher::new("a|b", MatchMode::Regex, true).expect("pattern");
        assert!(!alternation.is_match("ab"));
    }

    #[test]
    fn literal_modes() {
        let exact = StringMatcher::new("A.b", MatchMode::Literal, true).expect("pattern");
        assert!(exact.is_match("A.b"));
        assert!(!exact.is_match("a.b"));
        let folded = StringMatcher::new("A.b", MatchMode::Literal, false).expect("pattern");
        assert!(folded.is_match("a.B"));
        assert!(!folded.is_match("axb"));
    }

    #[test]
    fn invalid_regex_fails_at_construction() {
        let err = StringMatcher::new("(unclosed", MatchMode::Regex, true).expect_err("bad regex");
        assert!(matches!(err, PredicateError::InvalidPattern(_)));
    }
}
