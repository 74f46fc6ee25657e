use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Error, NewQuestion, Question, QuestionStore, QuestionUpdate, eq_ignore_case};

/// `QuestionStore` held in process memory.
///
/// Identifiers start at 1 and are never reused, even after a delete.
#[derive(Debug, Default)]
pub struct InMemoryQuestionStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    questions: BTreeMap<i64, Question>,
}

impl Inner {
    fn insert(&mut self, question: NewQuestion) -> Question {
        self.last_id += 1;
        let question = question.into_question(self.last_id);
        self.questions.insert(question.id, question.clone());
        question
    }
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, keeping their identifiers.
    pub fn with_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let questions: BTreeMap<i64, Question> = questions.into_iter().map(|q| (q.id, q)).collect();
        let last_id = questions.keys().next_back().copied().unwrap_or_default();
        Self {
            inner: RwLock::new(Inner { last_id, questions }),
        }
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn list(&self, subject: Option<&str>) -> Result<Vec<Question>, Error> {
        let inner = self.inner.read().await;
        let questions = inner
            .questions
            .values()
            .filter(|q| subject.is_none_or(|s| eq_ignore_case(&q.subject, s)))
            .cloned()
            .collect();
        Ok(questions)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, Error> {
        Ok(self.inner.read().await.questions.get(&id).cloned())
    }

    async fn insert(&self, question: NewQuestion) -> Result<Question, Error> {
        Ok(self.inner.write().await.insert(question))
    }

    async fn insert_many(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, Error> {
        let mut inner = self.inner.write().await;
        Ok(questions.into_iter().map(|q| inner.insert(q)).collect())
    }

    async fn update(&self, id: i64, update: &QuestionUpdate) -> Result<Option<Question>, Error> {
        let mut inner = self.inner.write().await;
        let Some(question) = inner.questions.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(question);
        Ok(Some(question.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        Ok(self.inner.write().await.questions.remove(&id).is_some())
    }
}
