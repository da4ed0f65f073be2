//! # Spelling Corrector
//!
//! File: server/src/chat/corrector.rs
//!
//! ## Overview
//!
//! Rewrites a handful of common colloquial or misspelled Arabic forms into
//! their standard spelling before the message is looked up or forwarded.
//!
//! Every rule is a literal, case-insensitive, global substring replacement:
//! - the wrong form is escaped, so characters like `.` or `(` match themselves
//! - there are no word-boundary checks, so a rule also rewrites matching text
//!   inside longer words
//! - rules run in table order, each one over the output of the previous one
//!
use crate::core::error::{CoversChatError, Result};
use regex::{Regex, RegexBuilder};

/// Built-in correction table, in application order.
const BUILTIN_RULES: [(&str, &str); 8] = [
    ("قرايه", "قراءة"),
    ("سعاده", "سعادة"),
    ("انا", "أنا"),
    ("بحب", "أحب"),
    ("جدااا", "جدًا"),
    ("ليه", "لماذا"),
    ("ايه", "ماذا"),
    ("القرايه", "القراءة"),
];

/// A single find/replace rule with its compiled matcher.
#[derive(Debug, Clone)]
pub struct CorrectionRule {
    wrong: String,
    right: String,
    matcher: Regex,
}

impl CorrectionRule {
    /// Compiles `wrong` as an escaped, case-insensitive literal.
    pub fn new(wrong: &str, right: &str) -> Result<Self> {
        if wrong.is_empty() {
            return Err(CoversChatError::Config(
                "correction rule has an empty search text".to_string(),
            )
            .into());
        }

        let matcher = RegexBuilder::new(&regex::escape(wrong))
            .case_insensitive(true)
            .build()
            .map_err(|e| CoversChatError::Config(format!("correction rule '{}': {}", wrong, e)))?;

        Ok(Self {
            wrong: wrong.to_string(),
            right: right.to_string(),
            matcher,
        })
    }

    pub fn wrong(&self) -> &str {
        &self.wrong
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    fn apply(&self, text: &str) -> String {
        // NoExpand: `$` in the replacement is literal too.
        self.matcher
            .replace_all(text, regex::NoExpand(self.right.as_str()))
            .into_owned()
    }
}

/// Ordered set of correction rules.
#[derive(Debug, Clone)]
pub struct Corrector {
    rules: Vec<CorrectionRule>,
}

impl Corrector {
    pub fn new(rules: Vec<CorrectionRule>) -> Self {
        Self { rules }
    }

    /// The correction table shipped with the service.
    pub fn builtin() -> Result<Self> {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(wrong, right)| CorrectionRule::new(wrong, right))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[CorrectionRule] {
        &self.rules
    }

    /// Applies every rule in order and returns the corrected text.
    pub fn correct(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Corrector {
        Corrector::builtin().expect("built-in rules compile")
    }

    #[test]
    fn builtin_table_order_is_preserved() {
        let corrector = builtin();
        let wrongs: Vec<&str> = corrector.rules().iter().map(CorrectionRule::wrong).collect();
        assert_eq!(wrongs.first(), Some(&"قرايه"));
        assert_eq!(wrongs.last(), Some(&"القرايه"));
        assert_eq!(wrongs.len(), 8);
        assert_eq!(corrector.rules()[2].right(), "أنا");
    }

    #[test]
    fn corrects_known_forms() {
        let corrector = builtin();
        assert_eq!(corrector.correct("انا بحب القرايه جدااا"), "أنا أحب القراءة جدًا");
        assert_eq!(corrector.correct("ليه"), "لماذا");
        assert_eq!(corrector.correct("ايه الكتاب"), "ماذا الكتاب");
    }

    #[test]
    fn leaves_clean_text_alone() {
        let corrector = builtin();
        assert_eq!(corrector.correct("كيف حالك؟"), "كيف حالك؟");
        assert_eq!(corrector.correct(""), "");
    }

    #[test]
    fn rewrites_inside_longer_words() {
        let corrector = builtin();
        // "انا" sits inside "بانادول"; substring semantics rewrite it anyway.
        assert_eq!(corrector.correct("بانادول"), "بأنادول");
    }

    #[test]
    fn replaces_every_occurrence() {
        let corrector = builtin();
        assert_eq!(corrector.correct("سعاده و سعاده"), "سعادة و سعادة");
    }

    #[test]
    fn matches_case_insensitively() {
        let corrector = Corrector::new(vec![CorrectionRule::new("teh", "the").unwrap()]);
        assert_eq!(corrector.correct("Teh cat and TEH dog"), "the cat and the dog");
    }

    #[test]
    fn treats_patterns_literally() {
        let corrector = Corrector::new(vec![
            CorrectionRule::new("a.c", "X").unwrap(),
            CorrectionRule::new("(", "[").unwrap(),
            CorrectionRule::new("$", "$1").unwrap(),
        ]);
        // "abc" must not match "a.c"; "$1" must not be read as a capture group.
        assert_eq!(corrector.correct("abc a.c (x) $"), "abc X [x) $1");
    }

    #[test]
    fn rejects_empty_search_text() {
        assert!(CorrectionRule::new("", "x").is_err());
    }

    #[test]
    fn input_is_not_mutated() {
        let corrector = builtin();
        let input = String::from("انا");
        let out = corrector.correct(&input);
        assert_eq!(input, "انا");
        assert_eq!(out, "أنا");
    }
}
