//! # covers-chat Integration Test Common Helpers
//!
//! File: server/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests. Every command runs in a fresh
//! temporary working directory with `GEMINI_API_KEY` removed, so neither a
//! developer's `.env` nor their shell environment can switch the Gemini
//! provider on during tests.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Path of the compiled `covers-chat` binary for this test run.
pub fn chat_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("covers-chat")
}

/// # Get covers-chat Command (`chat_cmd`)
///
/// Returns an `assert_cmd::Command` for the binary, isolated in `workdir`.
pub fn chat_cmd(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("covers-chat").expect("Failed to find covers-chat binary for testing");
    cmd.current_dir(workdir.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Creates an empty working directory for one test.
pub fn workdir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp working directory")
}

/// The generic replies the service falls back to.
pub const FALLBACK_REPLIES: [&str; 4] = [
    "سؤال رائع! يمكنك البحث عن كتب في هذا الموضوع على موقعنا.",
    "أنصحك بزيارة قسم 'الكتب الموصى بها' على المنصة.",
    "هل تحب القراءة؟ جرب كتاب 'الخيميائي'، سيعجبك!",
    "لم أجد إجابة دقيقة، لكن يمكنك سؤال المجتمع في 'بين الغلافين'!",
];

/// Knowledge-base answers for "كيف حالك".
pub const HOW_ARE_YOU_REPLIES: [&str; 3] = [
    "الحمدلله أنا كويس، وماذا عنك؟",
    "أنا بخير، وأنت؟",
    "تمام! هل لديك استفسار عن الكتب؟",
];

/// Knowledge-base answers for the beginner reading-suggestions question.
pub const BEGINNER_REPLIES: [&str; 3] = [
    "جرب 'نظرية الفستق' لفهد الأحمدي – خفيف ومفيد.",
    "ابدأ بـ 'الخيميائي' لباولو كويلو – رواية ملهمة.",
    "أنصحك بـ 'رجال في الشمس' لغسان كنفاني – قصيرة وعميقة.",
];
