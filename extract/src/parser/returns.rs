//! Operation return type extraction.
//!
//! Operations announce their result in prose: `Returns True on success.`,
//! `On success, the sent Message is returned.`, `Returns an Array of Update
//! objects.` The first sentence that names a capitalized type wins.
//!
//! When a description has no such sentence, [`ReturnTypeTracker`] carries the
//! previous operation's type forward. This is a heuristic for documentation
//! that states a result once across consecutive paragraphs, and can carry an
//! unrelated type over malformed input.

use regex::Regex;
use std::sync::LazyLock;

use bot_api_typegen_core::TypeExpr;

use super::resolve::resolve_phrase;

// SAFETY: These regexes are compile-time constants and are validated by tests.
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?:\s+|$)").expect("static regex must compile"));
static ON_SUCCESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon success\b").expect("static regex must compile"));
static RETURNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[Rr]eturns\b").expect("static regex must compile"));
static TYPE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9_]*\b").expect("static regex must compile"));
static ARRAY_OF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\barray\s+of\s*$").expect("static regex must compile"));
static OF_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+of\b").expect("static regex must compile"));
static OBJECT_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+objects?\b").expect("static regex must compile"));
static OTHERWISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[Oo]therwise\b[^A-Z]*\b([A-Z][A-Za-z0-9_]*)\b").expect("static regex must compile")
});

/// Sentence shapes that announce a result, tried in order per sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReturnMatcher {
    /// `On success, the sent Message is returned`
    OnSuccess,
    /// `Returns True on success`
    Returns,
}

const RETURN_MATCHERS: [ReturnMatcher; 2] = [ReturnMatcher::OnSuccess, ReturnMatcher::Returns];

impl ReturnMatcher {
    /// Returns the part of the sentence after the announcing keyword.
    fn tail(self, sentence: &str) -> Option<&str> {
        let keyword = match self {
            Self::OnSuccess => ON_SUCCESS_RE.find(sentence),
            Self::Returns => RETURNS_RE.find(sentence),
        }?;
        Some(&sentence[keyword.end()..])
    }
}

/// A return type found in one sentence, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnPhrase {
    pub type_name: String,
    pub is_array: bool,
    pub fallback: Option<String>,
}

impl ReturnPhrase {
    pub fn resolve(&self) -> TypeExpr {
        let mut resolved = resolve_phrase(&self.type_name);
        if self.is_array {
            resolved = TypeExpr::array(resolved);
        }
        match &self.fallback {
            Some(fallback) => TypeExpr::Union(vec![resolved, resolve_phrase(fallback)]),
            None => resolved,
        }
    }
}

/// Finds the first result-announcing sentence in `description`.
pub fn find_return_phrase(description: &str) -> Option<ReturnPhrase> {
    SENTENCE_END_RE.split(description).find_map(|sentence| {
        RETURN_MATCHERS
            .iter()
            .filter_map(|matcher| matcher.tail(sentence))
            .find_map(parse_tail)
    })
}

/// Extracts and resolves the return type announced in `description`.
pub fn extract_return_type(description: &str) -> Option<TypeExpr> {
    find_return_phrase(description).map(|phrase| phrase.resolve())
}

fn parse_tail(tail: &str) -> Option<ReturnPhrase> {
    let word = TYPE_WORD_RE
        .find_iter(tail)
        .find(|word| !(word.as_str() == "Array" && OF_PREFIX_RE.is_match(&tail[word.end()..])))?;
    let is_array = ARRAY_OF_RE.is_match(&tail[..word.start()]);
    let after = &tail[word.end()..];

    let mut type_name = word.as_str().to_string();
    if is_array
        && type_name.ends_with('s')
        && !type_name.ends_with("ss")
        && !OBJECT_SUFFIX_RE.is_match(after)
    {
        type_name.pop();
    }

    let fallback = OTHERWISE_RE
        .captures(after)
        .map(|caps| caps[1].to_string());

    Some(ReturnPhrase {
        type_name,
        is_array,
        fallback,
    })
}

/// How an operation's return type was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnResolution {
    Found(TypeExpr),
    /// No sentence matched; the previous operation's type was reused.
    CarriedOver(TypeExpr),
    /// No sentence matched and there was nothing to carry over.
    Missing,
}

impl ReturnResolution {
    pub fn into_type(self) -> TypeExpr {
        match self {
            Self::Found(ty) | Self::CarriedOver(ty) => ty,
            Self::Missing => TypeExpr::unknown(),
        }
    }
}

/// Carries return types across consecutive operations of one run.
#[derive(Debug, Default)]
pub struct ReturnTypeTracker {
    last: Option<TypeExpr>,
}

impl ReturnTypeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, description: &str) -> ReturnResolution {
        match extract_return_type(description) {
            Some(found) => {
                self.last = Some(found.clone());
                ReturnResolution::Found(found)
            }
            None => match &self.last {
                Some(previous) => ReturnResolution::CarriedOver(previous.clone()),
                None => ReturnResolution::Missing,
            },
        }
    }
}
