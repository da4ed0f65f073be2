//! Lookup-key normalization.
//!
//! Turns a message into the canonical form used for exact-match lookups in
//! the knowledge base: lowercase, without the punctuation users tend to add
//! (`؟ , . : !`), with whitespace collapsed and trimmed.

/// Punctuation removed before lookup.
const STRIPPED_PUNCTUATION: [char; 5] = ['؟', ',', '.', ':', '!'];

/// Normalize text for knowledge-base lookup.
///
/// Lowercasing is Unicode-aware and leaves Arabic untouched. Trimming happens
/// after punctuation removal as well, so `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
