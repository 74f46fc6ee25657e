//! Quiz Service
//!
//! HTTP API over the question store and quiz scorer.
//!
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post, put},
};
use store::{QuestionStore, db, memory::InMemoryQuestionStore};
use tower_http::{
    LatencyUnit,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

pub mod config;
pub mod error;
pub mod routes;

use config::{AppState, EnvVars};

pub fn app(state: AppState, env_vars: &EnvVars) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(env_vars.allowed_origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/status/ping", get(routes::get_status_ping))
        .route(
            "/api/questions",
            get(routes::get_questions).post(routes::post_question),
        )
        .route("/api/questions/batch", post(routes::post_questions_batch))
        .route(
            "/api/questions/{id}",
            put(routes::put_question).delete(routes::delete_question),
        )
        .route("/api/quiz/submit", post(routes::post_quiz_submit))
        .layer(TimeoutLayer::new(Duration::from_millis(
            env_vars.request_timeout_in_ms,
        )))
        .layer(RequestBodyLimitLayer::new(env_vars.request_body_size_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros),
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// MongoDB when `MONGODB_URI` is set, otherwise an in-memory store.
pub async fn store_from_env(env_vars: &EnvVars) -> anyhow::Result<Arc<dyn QuestionStore>> {
    let Some(mongodb_uri) = &env_vars.mongodb_uri else {
        info!("using in-memory question store");
        return Ok(Arc::new(InMemoryQuestionStore::new()));
    };

    let client = db::client(mongodb_uri).await?;
    info!("connected to MongoDB");
    Ok(Arc::new(db::MongoQuestionStore::new(&client)?))
}
