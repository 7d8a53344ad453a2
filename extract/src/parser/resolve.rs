//! Type phrase resolution.
//!
//! Turns documented type phrases such as `Array of Array of PhotoSize` or
//! `Integer or String` into [`TypeExpr`]s. String and integer fields whose
//! description enumerates their legal values resolve to a
//! [`TypeExpr::LiteralSet`] instead of the bare primitive.

use regex::Regex;
use std::sync::LazyLock;

use bot_api_typegen_core::{Primitive, TypeExpr};

// SAFETY: These regexes are compile-time constants and are validated by tests.
static ARRAY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^array\s+of\s+").expect("static regex must compile"));
static UNION_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*,\s*(?:and\s+|or\s+)?|\s+or\s+|\s+and\s+").expect("static regex must compile")
});
static QUOTED_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:one of|can be either|can be|must be|currently|always|either)\b")
        .expect("static regex must compile")
});
// Unquoted values need a stricter lead-in: `can be empty` is prose.
static BARE_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:one of|can be either|must be|currently)\b")
        .expect("static regex must compile")
});
static MULTIPLIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*\*\s*(\d+)").expect("static regex must compile"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+").expect("static regex must compile"));
static BARE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*").expect("static regex must compile"));
static LIST_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:,\s*(?:(?:or|and)\s+)?|(?:or|and)\s+)").expect("static regex must compile")
});

/// Resolves a field's type phrase, consulting its description for
/// enumerated values.
pub fn resolve_type(phrase: &str, description: &str) -> TypeExpr {
    let resolved = resolve_phrase(phrase);
    if let Some(primitive) = resolved.as_primitive().filter(|p| p.admits_enumeration()) {
        if let Some(values) = detect_enumeration(primitive, description) {
            return TypeExpr::LiteralSet(values);
        }
    }
    resolved
}

/// Resolves a type phrase on its own.
pub fn resolve_phrase(phrase: &str) -> TypeExpr {
    let phrase = phrase.trim();

    if let Some(found) = ARRAY_PREFIX_RE.find(phrase) {
        return TypeExpr::array(resolve_phrase(&phrase[found.end()..]));
    }

    let operands: Vec<&str> = UNION_SEPARATOR_RE
        .split(phrase)
        .map(str::trim)
        .filter(|operand| !operand.is_empty())
        .collect();
    if operands.len() > 1 {
        return TypeExpr::Union(operands.into_iter().map(resolve_phrase).collect());
    }

    match Primitive::from_doc_name(phrase) {
        Some(primitive) => TypeExpr::Primitive(primitive),
        None => TypeExpr::named(phrase),
    }
}

/// Alternative phrasings of an enumeration sentence, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumerationMatcher {
    /// `can be either “private”, “group” or “channel”`
    Quoted,
    /// `must be one of 2 * 50, 3 * 50, or 100`, `must be article`
    Bare,
}

const ENUMERATION_MATCHERS: [EnumerationMatcher; 2] =
    [EnumerationMatcher::Quoted, EnumerationMatcher::Bare];

/// Finds the closed set of values a description enumerates. The first
/// matcher that succeeds wins; partial matches are never merged.
pub fn detect_enumeration(primitive: Primitive, description: &str) -> Option<Vec<String>> {
    ENUMERATION_MATCHERS
        .iter()
        .find_map(|matcher| matcher.try_match(primitive, description))
}

impl EnumerationMatcher {
    fn keywords(self) -> &'static Regex {
        match self {
            Self::Quoted => &QUOTED_KEYWORD_RE,
            Self::Bare => &BARE_KEYWORD_RE,
        }
    }

    fn try_match(self, primitive: Primitive, description: &str) -> Option<Vec<String>> {
        self.keywords().find_iter(description).find_map(|keyword| {
            let rest = &description[keyword.end()..];
            match self {
                Self::Quoted => scan_quoted_list(rest),
                Self::Bare => scan_bare_list(rest, primitive),
            }
        })
    }
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '“' => Some('”'),
        '"' => Some('"'),
        _ => None,
    }
}

fn scan_quoted_list(text: &str) -> Option<Vec<String>> {
    let mut rest = text;
    let mut values = Vec::new();

    loop {
        rest = rest.trim_start();
        if !values.is_empty() {
            rest = skip_parenthetical(rest);
            if let Some(found) = LIST_SEPARATOR_RE.find(rest) {
                rest = &rest[found.end()..];
            }
            rest = rest.trim_start();
        }

        let Some(open) = rest.chars().next() else {
            break;
        };
        let Some(close) = closing_quote(open) else {
            break;
        };
        let body = &rest[open.len_utf8()..];
        let end = body.find(close)?;
        values.push(body[..end].to_string());
        rest = &body[end + close.len_utf8()..];
    }

    (!values.is_empty()).then_some(values)
}

fn skip_parenthetical(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with('(') {
        if let Some(end) = trimmed.find(')') {
            return &trimmed[end + 1..];
        }
    }
    text
}

/// Strips a qualifier attached to a bare item: `(…)` or `for …` up to the
/// next list separator.
fn skip_qualifiers(text: &str) -> &str {
    let mut rest = skip_parenthetical(text);
    let trimmed = rest.trim_start();
    if let Some(after_for) = trimmed.strip_prefix("for ") {
        let stop = after_for
            .find([',', ';', '.', ')'])
            .into_iter()
            .chain(after_for.find(" or "))
            .chain(after_for.find(" and "))
            .min()
            .unwrap_or(after_for.len());
        rest = &after_for[stop..];
    }
    rest
}

fn scan_bare_item(text: &str, primitive: Primitive) -> Option<(String, &str)> {
    if let Some(caps) = MULTIPLIER_RE.captures(text) {
        let lhs: u64 = caps[1].parse().ok()?;
        let rhs: u64 = caps[2].parse().ok()?;
        let product = lhs.checked_mul(rhs)?;
        return Some((product.to_string(), &text[caps[0].len()..]));
    }
    if let Some(found) = NUMBER_RE.find(text) {
        return Some((found.as_str().to_string(), &text[found.end()..]));
    }
    if primitive == Primitive::String {
        if let Some(found) = BARE_WORD_RE.find(text) {
            return Some((found.as_str().to_string(), &text[found.end()..]));
        }
    }
    None
}

fn ends_list(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.is_empty() || trimmed.starts_with(['.', ';', ')'])
}

fn scan_bare_list(text: &str, primitive: Primitive) -> Option<Vec<String>> {
    let mut rest = text.trim_start();
    let mut values = Vec::new();

    loop {
        let (value, after) = scan_bare_item(rest, primitive)?;
        values.push(value);
        rest = skip_qualifiers(after);

        if ends_list(rest) {
            return Some(values);
        }
        let separator = LIST_SEPARATOR_RE.find(rest)?;
        rest = rest[separator.end()..].trim_start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeExpr {
        TypeExpr::Primitive(Primitive::Integer)
    }

    fn string() -> TypeExpr {
        TypeExpr::Primitive(Primitive::String)
    }

    fn literals(values: &[&str]) -> TypeExpr {
        TypeExpr::LiteralSet(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_nested_arrays() {
        assert_eq!(
            resolve_phrase("Array of Array of Integer"),
            TypeExpr::array(TypeExpr::array(int()))
        );
        assert_eq!(
            resolve_phrase("Array of Array of PhotoSize"),
            TypeExpr::array(TypeExpr::array(TypeExpr::named("PhotoSize")))
        );
    }

    #[test]
    fn test_or_union() {
        assert_eq!(
            resolve_phrase("Integer or String"),
            TypeExpr::Union(vec![int(), string()])
        );
        assert_eq!(
            resolve_phrase("InputFile or String"),
            TypeExpr::Union(vec![TypeExpr::named("InputFile"), string()])
        );
    }

    #[test]
    fn test_array_of_comma_and_list() {
        assert_eq!(
            resolve_phrase("Array of InputMediaAudio, InputMediaDocument, InputMediaPhoto and InputMediaVideo"),
            TypeExpr::array(TypeExpr::Union(vec![
                TypeExpr::named("InputMediaAudio"),
                TypeExpr::named("InputMediaDocument"),
                TypeExpr::named("InputMediaPhoto"),
                TypeExpr::named("InputMediaVideo"),
            ]))
        );
    }

    #[test]
    fn test_primitive_aliases_and_passthrough() {
        assert_eq!(resolve_phrase("Float number"), TypeExpr::Primitive(Primitive::Float));
        assert_eq!(resolve_phrase("True"), TypeExpr::Primitive(Primitive::True));
        assert_eq!(resolve_phrase("Boolean"), TypeExpr::Primitive(Primitive::Boolean));
        assert_eq!(resolve_phrase("ChatMember"), TypeExpr::named("ChatMember"));
    }

    #[test]
    fn test_quoted_enumeration() {
        assert_eq!(
            resolve_type("String", ", must be one of “a”, “b”, or “c”"),
            literals(&["a", "b", "c"])
        );
        assert_eq!(
            resolve_type(
                "String",
                "Type of the chat, can be either “private”, “group”, “supergroup” or “channel”"
            ),
            literals(&["private", "group", "supergroup", "channel"])
        );
    }

    #[test]
    fn test_quoted_enumeration_skips_annotations() {
        let description = "Type of the entity. Currently, can be “mention” (@username), \
                           “hashtag” (#hashtag), or “url” (https://telegram.org)";
        assert_eq!(
            resolve_type("String", description),
            literals(&["mention", "hashtag", "url"])
        );
    }

    #[test]
    fn test_numeric_enumeration_with_multipliers() {
        assert_eq!(
            resolve_type("Integer", "; must be one of 2 * 50, 3 * 50, or 100"),
            literals(&["100", "150", "100"])
        );
    }

    #[test]
    fn test_numeric_enumeration_strips_qualifiers() {
        assert_eq!(
            resolve_type(
                "Integer",
                "Size limit; must be one of 512 (default), 1024 for premium users, or 2048."
            ),
            literals(&["512", "1024", "2048"])
        );
    }

    #[test]
    fn test_bare_identifier_enumeration() {
        assert_eq!(
            resolve_type("String", "Scope type, must be bot_command_scope_default"),
            literals(&["bot_command_scope_default"])
        );
        assert_eq!(
            resolve_type("String", "Type of the result, must be article"),
            literals(&["article"])
        );
    }

    #[test]
    fn test_prose_after_keyword_is_not_enumeration() {
        assert_eq!(
            resolve_type("String", "Text that must be sent to the chat"),
            string()
        );
        assert_eq!(
            resolve_type("Integer", "Identifier; must be positive"),
            int()
        );
    }

    #[test]
    fn test_loose_lead_ins_need_quoted_values() {
        assert_eq!(resolve_type("String", "Display name; can be empty."), string());
        assert_eq!(resolve_type("String", "Either way, always present"), string());
        assert_eq!(
            resolve_type("String", "Result kind, can be “ok” or “error”"),
            literals(&["ok", "error"])
        );
    }

    #[test]
    fn test_composite_phrases_never_become_enumerations() {
        assert_eq!(
            resolve_type("Array of String", "can be either “a” or “b”"),
            TypeExpr::array(string())
        );
        assert_eq!(
            resolve_type("Boolean", "always “true”"),
            TypeExpr::Primitive(Primitive::Boolean)
        );
    }

    #[test]
    fn test_quoted_matcher_wins_over_bare() {
        assert_eq!(
            resolve_type("String", "Status, always “creator”"),
            literals(&["creator"])
        );
    }
}
