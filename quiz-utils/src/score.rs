use std::sync::Arc;

use serde::{Deserialize, Serialize};
use store::{QuestionStore, eq_ignore_case};
use tracing::{debug, instrument};

use crate::error::Error;

/// A learner's answer to one question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: i64,
    /// Unanswered questions may be sent as `null`. They never score.
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub answers: Vec<UserAnswer>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub score: usize,
    pub total: usize,
}

/// Scores submissions against the stored correct answers.
#[derive(Clone)]
pub struct QuizScorer {
    store: Arc<dyn QuestionStore>,
}

impl QuizScorer {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// Counts the answers matching their question's correct answer.
    ///
    /// `total` is always the number of submitted answers. Answers referring to an
    /// unknown question are counted in `total` but never in `score`.
    #[instrument(skip_all, fields(total = submission.answers.len()), err(Debug))]
    pub async fn score(&self, submission: &QuizSubmission) -> Result<SubmitResponse, Error> {
        let mut score = 0;

        for user_answer in &submission.answers {
            let Some(question) = self.store.find_by_id(user_answer.question_id).await? else {
                debug!(
                    question = user_answer.question_id,
                    "skipping answer to unknown question"
                );
                continue;
            };

            if user_answer
                .answer
                .as_deref()
                .is_some_and(|answer| compare_answer(&question.correct_answer, answer))
            {
                score += 1;
            }
        }

        let total = submission.answers.len();
        debug!(score, total, "scored submission");
        Ok(SubmitResponse { score, total })
    }
}

/// Case-insensitive comparison of a submitted answer against the correct answer.
pub fn compare_answer(correct_answer: &str, answer: &str) -> bool {
    eq_ignore_case(correct_answer, answer)
}
