//! Question Store
//!
//! Persistent storage for multiple-choice quiz questions.
//!
//! ## Current API
//!
//! - `QuestionStore` trait, injected into services as `Arc<dyn QuestionStore>`
//! - MongoDB adapter (`db::MongoQuestionStore`)
//! - In-memory adapter (`memory::InMemoryQuestionStore`)
//!
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod db;
pub mod error;
pub mod memory;

pub use error::Error;

/// A stored multiple-choice question.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub subject: String,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
}

/// Payload for creating a question. Identifiers are always assigned by the store,
/// so an `id` sent by the client is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: String,
    #[validate(length(min = 1, message = "questionText must not be empty"))]
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[validate(length(min = 1, message = "correctAnswer must not be empty"))]
    pub correct_answer: String,
}

impl NewQuestion {
    pub fn into_question(self, id: i64) -> Question {
        Question {
            id,
            subject: self.subject,
            question_text: self.question_text,
            option_a: self.option_a,
            option_b: self.option_b,
            option_c: self.option_c,
            option_d: self.option_d,
            correct_answer: self.correct_answer,
        }
    }
}

/// Replacement values for an existing question.
///
/// `id` and `subject` are not part of the update; both are ignored if present in the body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    #[validate(length(min = 1, message = "questionText must not be empty"))]
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[validate(length(min = 1, message = "correctAnswer must not be empty"))]
    pub correct_answer: String,
}

impl QuestionUpdate {
    pub fn apply(&self, question: &mut Question) {
        question.question_text = self.question_text.clone();
        question.option_a = self.option_a.clone();
        question.option_b = self.option_b.clone();
        question.option_c = self.option_c.clone();
        question.option_d = self.option_d.clone();
        question.correct_answer = self.correct_answer.clone();
    }
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// All questions in insertion order, or only those whose subject matches
    /// `subject` case-insensitively.
    async fn list(&self, subject: Option<&str>) -> Result<Vec<Question>, Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, Error>;

    /// Persist a question under a freshly assigned identifier.
    async fn insert(&self, question: NewQuestion) -> Result<Question, Error>;

    /// Persist each question under a fresh identifier, in input order.
    async fn insert_many(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, Error>;

    /// Returns `None` if no question has the identifier.
    async fn update(&self, id: i64, update: &QuestionUpdate) -> Result<Option<Question>, Error>;

    /// Returns `false` if no question has the identifier.
    async fn delete(&self, id: i64) -> Result<bool, Error>;
}

/// Case-insensitive equality, compared one character at a time.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
