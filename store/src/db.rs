use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    options::{ClientOptions, Collation, CollationStrength, ReturnDocument},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;

use crate::{Error, NewQuestion, Question, QuestionStore, QuestionUpdate};

pub const QUESTION_COLLECTION: &str = "questions";
pub const COUNTER_COLLECTION: &str = "counters";
const QUESTION_COUNTER_ID: &str = "questions";

pub fn get_collection<T>(db: &Database, collection_name: &str) -> Collection<T>
where
    T: Send + Sync + DeserializeOwned + Serialize,
{
    db.collection::<T>(collection_name)
}

pub async fn client(uri: &str) -> Result<Client, Error> {
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some(env!("CARGO_CRATE_NAME").to_string());

    let client = Client::with_options(client_options)?;

    // Ping the server to see if you can connect to the cluster
    client
        .default_database()
        .ok_or(Error::MissingDatabase)?
        .run_command(doc! {"ping": 1})
        .await?;

    Ok(client)
}

/// Question as stored in the `questions` collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDocument {
    #[serde(rename = "_id")]
    id: i64,
    subject: String,
    question_text: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct_answer: String,
}

impl From<Question> for QuestionDocument {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            subject: q.subject,
            question_text: q.question_text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
            correct_answer: q.correct_answer,
        }
    }
}

impl From<QuestionDocument> for Question {
    fn from(d: QuestionDocument) -> Self {
        Self {
            id: d.id,
            subject: d.subject,
            question_text: d.question_text,
            option_a: d.option_a,
            option_b: d.option_b,
            option_c: d.option_c,
            option_d: d.option_d,
            correct_answer: d.correct_answer,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    id: String,
    seq: i64,
}

/// `QuestionStore` backed by MongoDB.
///
/// Identifiers are integers drawn from a sequence document in the `counters` collection.
#[derive(Clone, Debug)]
pub struct MongoQuestionStore {
    questions: Collection<QuestionDocument>,
    counters: Collection<Counter>,
}

impl MongoQuestionStore {
    /// Uses the default database named in the client's URI.
    pub fn new(client: &Client) -> Result<Self, Error> {
        let db = client.default_database().ok_or(Error::MissingDatabase)?;
        Ok(Self::with_database(&db))
    }

    pub fn with_database(db: &Database) -> Self {
        Self {
            questions: get_collection(db, QUESTION_COLLECTION),
            counters: get_collection(db, COUNTER_COLLECTION),
        }
    }

    /// Advances the question sequence by `count` and returns the first reserved id.
    #[instrument(skip(self), err(Debug))]
    async fn reserve_ids(&self, count: i64) -> Result<i64, Error> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! {"_id": QUESTION_COUNTER_ID},
                doc! {"$inc": {"seq": count}},
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| Error::Counter(format!("counter {QUESTION_COUNTER_ID} not returned")))?;

        Ok(counter.seq - count + 1)
    }
}

fn case_insensitive() -> Collation {
    Collation::builder()
        .locale("en")
        .strength(CollationStrength::Secondary)
        .build()
}

#[async_trait]
impl QuestionStore for MongoQuestionStore {
    #[instrument(skip(self), err(Debug))]
    async fn list(&self, subject: Option<&str>) -> Result<Vec<Question>, Error> {
        let questions: Vec<QuestionDocument> = match subject {
            Some(subject) => {
                self.questions
                    .find(doc! {"subject": subject})
                    .collation(case_insensitive())
                    .sort(doc! {"_id": 1})
                    .await?
                    .try_collect()
                    .await?
            }
            None => {
                self.questions
                    .find(doc! {})
                    .sort(doc! {"_id": 1})
                    .await?
                    .try_collect()
                    .await?
            }
        };

        Ok(questions.into_iter().map(Question::from).collect())
    }

    #[instrument(skip(self), err(Debug))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, Error> {
        let question = self.questions.find_one(doc! {"_id": id}).await?;
        Ok(question.map(Question::from))
    }

    #[instrument(skip_all, err(Debug))]
    async fn insert(&self, question: NewQuestion) -> Result<Question, Error> {
        let id = self.reserve_ids(1).await?;
        let question = question.into_question(id);
        self.questions
            .insert_one(QuestionDocument::from(question.clone()))
            .await?;
        tracing::debug!(id, "inserted question");
        Ok(question)
    }

    #[instrument(skip_all, fields(count = questions.len()), err(Debug))]
    async fn insert_many(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, Error> {
        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let count = i64::try_from(questions.len())
            .map_err(|e| Error::Counter(format!("batch too large: {e}")))?;
        let first_id = self.reserve_ids(count).await?;

        let questions: Vec<Question> = questions
            .into_iter()
            .zip(first_id..)
            .map(|(question, id)| question.into_question(id))
            .collect();

        self.questions
            .insert_many(questions.iter().cloned().map(QuestionDocument::from))
            .await?;

        Ok(questions)
    }

    #[instrument(skip(self, update), err(Debug))]
    async fn update(&self, id: i64, update: &QuestionUpdate) -> Result<Option<Question>, Error> {
        let updated = self
            .questions
            .find_one_and_update(
                doc! {"_id": id},
                doc! {
                    "$set": {
                        "questionText": update.question_text.as_str(),
                        "optionA": update.option_a.as_str(),
                        "optionB": update.option_b.as_str(),
                        "optionC": update.option_c.as_str(),
                        "optionD": update.option_d.as_str(),
                        "correctAnswer": update.correct_answer.as_str(),
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated.map(Question::from))
    }

    #[instrument(skip(self), err(Debug))]
    async fn delete(&self, id: i64) -> Result<bool, Error> {
        let res = self.questions.delete_one(doc! {"_id": id}).await?;
        Ok(res.deleted_count > 0)
    }
}
