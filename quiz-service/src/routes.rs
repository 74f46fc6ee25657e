use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use quiz_utils::score::{QuizSubmission, SubmitResponse};
use serde::Deserialize;
use store::{NewQuestion, Question, QuestionUpdate};
use tracing::info;
use validator::Validate;

use crate::{config::AppState, error::Error};

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    subject: Option<String>,
}

pub async fn get_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionQuery>,
) -> Result<Json<Vec<Question>>, Error> {
    let questions = state
        .questions
        .list_questions(query.subject.as_deref())
        .await?;
    Ok(Json(questions))
}

pub async fn post_question(
    State(state): State<AppState>,
    Json(question): Json<NewQuestion>,
) -> Result<Json<Question>, Error> {
    question.validate()?;
    let question = state.questions.create_question(question).await?;
    info!(id = question.id, "question created");
    Ok(Json(question))
}

/// Every question is validated before any of them is stored.
pub async fn post_questions_batch(
    State(state): State<AppState>,
    Json(questions): Json<Vec<NewQuestion>>,
) -> Result<Json<Vec<Question>>, Error> {
    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|e| Error::Server(StatusCode::BAD_REQUEST, format!("question {index}: {e}")))?;
    }
    let questions = state.questions.create_questions(questions).await?;
    info!(count = questions.len(), "questions created");
    Ok(Json(questions))
}

pub async fn put_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<QuestionUpdate>,
) -> Result<Json<Question>, Error> {
    update.validate()?;
    let question = state.questions.update_question(id, &update).await?;
    info!(id, "question updated");
    Ok(Json(question))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    state.questions.delete_question(id).await?;
    info!(id, "question deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_quiz_submit(
    State(state): State<AppState>,
    Json(submission): Json<QuizSubmission>,
) -> Result<Json<SubmitResponse>, Error> {
    let res = state.scorer.score(&submission).await?;
    Ok(Json(res))
}

pub async fn get_status_ping() -> impl IntoResponse {
    info!("Status");
    StatusCode::OK
}
