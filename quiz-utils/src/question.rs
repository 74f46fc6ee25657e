use std::sync::Arc;

use store::{NewQuestion, Question, QuestionStore, QuestionUpdate};
use tracing::{debug, instrument};

use crate::error::Error;

/// Retrieval and mutation of stored questions.
#[derive(Clone)]
pub struct QuestionService {
    store: Arc<dyn QuestionStore>,
}

impl QuestionService {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// Every question, or only those whose subject matches `subject` ignoring case.
    /// An empty filter is treated as absent.
    #[instrument(skip(self), err(Debug))]
    pub async fn list_questions(&self, subject: Option<&str>) -> Result<Vec<Question>, Error> {
        let subject = subject.filter(|s| !s.is_empty());
        let questions = self.store.list(subject).await?;
        debug!(count = questions.len(), "listed questions");
        Ok(questions)
    }

    #[instrument(skip_all, err(Debug))]
    pub async fn create_question(&self, question: NewQuestion) -> Result<Question, Error> {
        let question = self.store.insert(question).await?;
        debug!(id = question.id, "created question");
        Ok(question)
    }

    /// Best-effort batch: questions stored before a failure are not rolled back.
    #[instrument(skip_all, fields(count = questions.len()), err(Debug))]
    pub async fn create_questions(
        &self,
        questions: Vec<NewQuestion>,
    ) -> Result<Vec<Question>, Error> {
        Ok(self.store.insert_many(questions).await?)
    }

    /// Replaces the text, options, and correct answer. The subject is left as created.
    #[instrument(skip(self, update), err(Debug))]
    pub async fn update_question(
        &self,
        id: i64,
        update: &QuestionUpdate,
    ) -> Result<Question, Error> {
        self.store
            .update(id, update)
            .await?
            .ok_or(Error::NotFound(id))
    }

    #[instrument(skip(self), err(Debug))]
    pub async fn delete_question(&self, id: i64) -> Result<(), Error> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use store::memory::InMemoryQuestionStore;

    use super::*;

    fn new_question(subject: &str, text: &str) -> NewQuestion {
        NewQuestion {
            subject: subject.to_string(),
            question_text: text.to_string(),
            option_a: "3".to_string(),
            option_b: "4".to_string(),
            option_c: "5".to_string(),
            option_d: "6".to_string(),
            correct_answer: "B".to_string(),
        }
    }

    fn service() -> QuestionService {
        QuestionService::new(Arc::new(InMemoryQuestionStore::new()))
    }

    #[tokio::test]
    async fn created_question_is_listed_with_id() {
        let service = service();
        let created = service
            .create_question(new_question("Math", "2 + 2?"))
            .await
            .unwrap();

        let questions = service.list_questions(None).await.unwrap();
        assert_eq!(questions, vec![created.clone()]);
        assert!(created.id > 0);
    }

    #[tokio::test]
    async fn empty_subject_filter_returns_everything() {
        let service = service();
        service
            .create_questions(vec![
                new_question("Math", "2 + 2?"),
                new_question("Science", "H2O?"),
            ])
            .await
            .unwrap();

        assert_eq!(service.list_questions(Some("")).await.unwrap().len(), 2);
        assert_eq!(service.list_questions(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn subject_filter_ignores_case() {
        let service = service();
        let created = service
            .create_questions(vec![
                new_question("Math", "2 + 2?"),
                new_question("Science", "H2O?"),
                new_question("math", "3 * 3?"),
            ])
            .await
            .unwrap();

        let math = service.list_questions(Some("MATH")).await.unwrap();
        assert_eq!(math, vec![created[0].clone(), created[2].clone()]);
        assert!(service.list_questions(Some("Art")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batch_assigns_distinct_ids_in_order() {
        let service = service();
        let created = service
            .create_questions(vec![
                new_question("Math", "first"),
                new_question("Math", "second"),
                new_question("Math", "third"),
            ])
            .await
            .unwrap();

        let texts: Vec<&str> = created.iter().map(|q| q.question_text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(created.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn update_replaces_everything_but_subject() {
        let service = service();
        let created = service
            .create_question(new_question("Math", "2 + 2?"))
            .await
            .unwrap();

        let update = QuestionUpdate {
            question_text: "2 + 3?".to_string(),
            option_a: "5".to_string(),
            option_b: "6".to_string(),
            option_c: "7".to_string(),
            option_d: "8".to_string(),
            correct_answer: "A".to_string(),
        };
        let updated = service.update_question(created.id, &update).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.subject, "Math");
        assert_eq!(updated.question_text, "2 + 3?");
        assert_eq!(updated.option_a, "5");
        assert_eq!(updated.option_d, "8");
        assert_eq!(updated.correct_answer, "A");
        assert_eq!(service.list_questions(None).await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found_and_changes_nothing() {
        let service = service();
        let created = service
            .create_question(new_question("Math", "2 + 2?"))
            .await
            .unwrap();

        let update = QuestionUpdate {
            question_text: "changed".to_string(),
            correct_answer: "C".to_string(),
            ..Default::default()
        };
        let err = service.update_question(999, &update).await.unwrap_err();

        assert!(matches!(err, Error::NotFound(999)));
        assert_eq!(service.list_questions(None).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn delete_removes_and_repeat_delete_is_not_found() {
        let service = service();
        let created = service
            .create_question(new_question("Math", "2 + 2?"))
            .await
            .unwrap();

        service.delete_question(created.id).await.unwrap();
        assert!(service.list_questions(None).await.unwrap().is_empty());

        for _ in 0..2 {
            let err = service.delete_question(created.id).await.unwrap_err();
            assert!(matches!(err, Error::NotFound(id) if id == created.id));
        }
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let err = service().delete_question(42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(42)));
    }
}
