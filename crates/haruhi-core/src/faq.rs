//! FAQ assistant source trait.
//!
//! The FAQ side panel reads suggested questions and answers them through a
//! single `FaqSource` seam. Two implementations exist in
//! `haruhi-interaction` (backend proxy and direct hosted-data-API); which
//! one runs is a configuration choice, not a code path split.

use async_trait::async_trait;

use crate::error::Result;

/// One suggested FAQ question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    /// The question text, shown verbatim and sent verbatim when picked.
    pub question: String,
}

impl FaqEntry {
    /// Creates an entry from question text.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// How a question reached the FAQ assistant.
///
/// The direct source forwards this distinction to the backend (`faq` for a
/// picked suggestion, `form` for typed input); the proxy source ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqOrigin {
    /// The user picked one of the suggested questions.
    Suggested,
    /// The user typed the question into the panel.
    Typed,
}

/// A source of FAQ suggestions and answers.
#[async_trait]
pub trait FaqSource: Send + Sync {
    /// Fetches the suggested questions, most important first.
    async fn suggested_questions(&self) -> Result<Vec<FaqEntry>>;

    /// Sends one question and returns the assistant's answer text.
    async fn ask(&self, question: &str, origin: FaqOrigin) -> Result<String>;
}
