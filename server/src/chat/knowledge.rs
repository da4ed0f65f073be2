//! # Knowledge Base and Fallback Replies
//!
//! File: server/src/chat/knowledge.rs
//!
//! ## Overview
//!
//! Two read-only tables built once at startup:
//! - `KnowledgeBase`: exact-match question keys mapped to one or more canned
//!   answers. A hit picks one answer uniformly at random.
//! - `FallbackPool`: generic replies used when neither the knowledge base nor
//!   the answer provider produced anything.
//!
//! ## Key Space
//!
//! Incoming messages are corrected and then normalized before lookup, so the
//! stored keys go through the same two steps when the table is built. A key
//! written as "انا ..." is therefore stored as "أنا ...", which is what a
//! corrected message will look like.
//!
use super::corrector::Corrector;
use super::normalize::normalize;
use super::random::{choose, RandomSource};
use crate::core::error::{CoversChatError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Canned answers shipped with the service.
const BUILTIN_ENTRIES: &[(&str, &[&str])] = &[
    (
        "كيف حالك",
        &[
            "الحمدلله أنا كويس، وماذا عنك؟",
            "أنا بخير، وأنت؟",
            "تمام! هل لديك استفسار عن الكتب؟",
        ],
    ),
    (
        "انا مبتدئ بالقراءه اقترح لي كتب",
        &[
            "جرب 'نظرية الفستق' لفهد الأحمدي – خفيف ومفيد.",
            "ابدأ بـ 'الخيميائي' لباولو كويلو – رواية ملهمة.",
            "أنصحك بـ 'رجال في الشمس' لغسان كنفاني – قصيرة وعميقة.",
        ],
    ),
    (
        "من نحن",
        &[
            "نحن منصة 'بين الغلافين'، مجتمع لعشاق القراءة والكتابة.",
            "مرحبًا بك في 'بين الغلافين' – استشر، اقرأ، ناقش!",
        ],
    ),
    (
        "اقترح لي كتاب عن السعادة",
        &[
            "كتاب 'فن اللامبالاة' لمارك مانسون – يغير نظرتك للحياة.",
            "جرب 'المخطط السعادة' – عملي ومفيد جدًا.",
        ],
    ),
    ("السلام عليكم", &["وعليكم السلام ورحمة الله وبركاته"]),
];

/// Generic replies shipped with the service.
const BUILTIN_FALLBACK: &[&str] = &[
    "سؤال رائع! يمكنك البحث عن كتب في هذا الموضوع على موقعنا.",
    "أنصحك بزيارة قسم 'الكتب الموصى بها' على المنصة.",
    "هل تحب القراءة؟ جرب كتاب 'الخيميائي'، سيعجبك!",
    "لم أجد إجابة دقيقة، لكن يمكنك سؤال المجتمع في 'بين الغلافين'!",
];

/// Exact-match question table.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<String, Vec<String>>,
}

impl KnowledgeBase {
    /// Builds a table from `(question, answers)` pairs.
    ///
    /// Each question is corrected and normalized to form its key. Entries
    /// without answers, or whose key normalizes to nothing, are rejected.
    /// Two questions that collapse to the same key have their answers merged.
    pub fn from_entries<I, Q, A>(entries: I, corrector: &Corrector) -> Result<Self>
    where
        I: IntoIterator<Item = (Q, Vec<A>)>,
        Q: AsRef<str>,
        A: Into<String>,
    {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();

        for (question, answers) in entries {
            let question = question.as_ref();
            let key = normalize(&corrector.correct(question));
            if key.is_empty() {
                return Err(CoversChatError::Config(format!(
                    "knowledge question '{}' has an empty lookup key",
                    question
                ))
                .into());
            }

            let answers: Vec<String> = answers.into_iter().map(Into::into).collect();
            if answers.is_empty() {
                return Err(CoversChatError::Config(format!(
                    "knowledge question '{}' has no answers",
                    question
                ))
                .into());
            }

            debug!("Knowledge entry '{}' -> {} answer(s)", key, answers.len());
            table.entry(key).or_default().extend(answers);
        }

        Ok(Self { entries: table })
    }

    /// The table shipped with the service.
    pub fn builtin(corrector: &Corrector) -> Result<Self> {
        Self::from_entries(
            BUILTIN_ENTRIES
                .iter()
                .map(|(question, answers)| (*question, answers.to_vec())),
            corrector,
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All candidates stored under `key`, if any.
    pub fn candidates(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Looks up an already-normalized key and picks one of its answers.
    pub fn lookup(&self, key: &str, random: &dyn RandomSource) -> Option<&str> {
        self.candidates(key)
            .and_then(|answers| choose(random, answers))
            .map(String::as_str)
    }
}

/// Non-empty list of generic replies.
#[derive(Debug, Clone)]
pub struct FallbackPool {
    replies: Vec<String>,
}

impl FallbackPool {
    /// Fails if `replies` is empty; the resolver relies on the pool always
    /// having something to say.
    pub fn new<A: Into<String>>(replies: Vec<A>) -> Result<Self> {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        if replies.is_empty() {
            return Err(CoversChatError::Config("fallback pool is empty".to_string()).into());
        }
        Ok(Self { replies })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_FALLBACK.to_vec())
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn pick(&self, random: &dyn RandomSource) -> &str {
        // Non-empty by construction.
        choose(random, &self.replies)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::random::{FixedIndex, ThreadRandom};

    fn corrector() -> Corrector {
        Corrector::builtin().expect("built-in rules compile")
    }

    #[test]
    fn builtin_table_has_all_entries() {
        let kb = KnowledgeBase::builtin(&corrector()).unwrap();
        assert_eq!(kb.len(), 5);
        assert_eq!(kb.candidates("كيف حالك").map(<[String]>::len), Some(3));
        assert_eq!(kb.candidates("من نحن").map(<[String]>::len), Some(2));
        assert_eq!(kb.candidates("السلام عليكم").map(<[String]>::len), Some(1));
    }

    #[test]
    fn keys_live_in_corrected_space() {
        let kb = KnowledgeBase::builtin(&corrector()).unwrap();
        assert!(kb.candidates("انا مبتدئ بالقراءه اقترح لي كتب").is_none());
        assert_eq!(
            kb.candidates("أنا مبتدئ بالقراءه اقترح لي كتب").map(<[String]>::len),
            Some(3)
        );
    }

    #[test]
    fn lookup_picks_the_requested_candidate() {
        let kb = KnowledgeBase::builtin(&corrector()).unwrap();
        assert_eq!(kb.lookup("كيف حالك", &FixedIndex(1)), Some("أنا بخير، وأنت؟"));
        assert_eq!(
            kb.lookup("كيف حالك", &FixedIndex(0)),
            Some("الحمدلله أنا كويس، وماذا عنك؟")
        );
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let kb = KnowledgeBase::builtin(&corrector()).unwrap();
        assert_eq!(kb.lookup("كيف", &ThreadRandom), None);
        assert_eq!(kb.lookup("كيف حالك اليوم", &ThreadRandom), None);
        assert_eq!(kb.lookup("", &ThreadRandom), None);
    }

    #[test]
    fn lookup_hit_is_always_a_candidate() {
        let kb = KnowledgeBase::builtin(&corrector()).unwrap();
        let candidates = kb.candidates("من نحن").unwrap().to_vec();
        for _ in 0..100 {
            let reply = kb.lookup("من نحن", &ThreadRandom).unwrap();
            assert!(candidates.iter().any(|c| c == reply));
        }
    }

    #[test]
    fn from_entries_normalizes_and_merges_keys() {
        let kb = KnowledgeBase::from_entries(
            vec![
                ("Hello!", vec!["one"]),
                ("  hello ", vec!["two"]),
            ],
            &corrector(),
        )
        .unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(
            kb.candidates("hello"),
            Some(&["one".to_string(), "two".to_string()][..])
        );
    }

    #[test]
    fn from_entries_rejects_bad_entries() {
        let empty_answers: Vec<(&str, Vec<&str>)> = vec![("سؤال", vec![])];
        assert!(KnowledgeBase::from_entries(empty_answers, &corrector()).is_err());

        let empty_key = vec![("!؟", vec!["reply"])];
        assert!(KnowledgeBase::from_entries(empty_key, &corrector()).is_err());
    }

    #[test]
    fn fallback_pool_rejects_empty() {
        assert!(FallbackPool::new(Vec::<String>::new()).is_err());
        assert!(FallbackPool::new(vec!["only"]).is_ok());
    }

    #[test]
    fn fallback_pick_is_member_of_pool() {
        let pool = FallbackPool::builtin().unwrap();
        assert_eq!(pool.replies().len(), 4);
        assert_eq!(pool.pick(&FixedIndex(3)), pool.replies()[3]);
        for _ in 0..100 {
            let reply = pool.pick(&ThreadRandom);
            assert!(pool.replies().iter().any(|r| r == reply));
        }
    }
}
