use std::{fmt, str::FromStr, sync::Arc};

use anyhow::{Context, bail};
use axum::http::HeaderValue;
use quiz_utils::{question::QuestionService, score::QuizScorer};
use sentry::types::Dsn;
use store::QuestionStore;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub questions: QuestionService,
    pub scorer: QuizScorer,
}

impl AppState {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self {
            questions: QuestionService::new(store.clone()),
            scorer: QuizScorer::new(store),
        }
    }
}

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5174,http://localhost:3000";

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub allowed_origins: Vec<HeaderValue>,
    pub environment: Environment,
    pub mongodb_uri: Option<String>,
    pub port: u16,
    pub request_body_size_limit: usize,
    pub request_timeout_in_ms: u64,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(s)
    }
}

impl EnvVars {
    /// Reads the configuration from the process environment.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `var`. Empty values are treated as unset.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| var(key).filter(|v| !v.is_empty());

        let port = parse_or(var("PORT"), "PORT", 8080)?;

        let mongodb_uri = var("MONGODB_URI");
        if mongodb_uri.is_none() {
            warn!("MONGODB_URI not set. Questions will only be kept in memory.");
        }

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("ALLOWED_ORIGINS contains invalid origin '{origin}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let request_timeout_in_ms =
            parse_or(var("REQUEST_TIMEOUT_IN_MS"), "REQUEST_TIMEOUT_IN_MS", 30_000)?;

        let request_body_size_limit = parse_or(
            var("REQUEST_BODY_SIZE_LIMIT"),
            "REQUEST_BODY_SIZE_LIMIT",
            1024 * 1024,
        )?;

        let sentry_dsn = match var("SENTRY_DSN") {
            Some(dsn_string) => {
                if !valid_sentry_dsn(&dsn_string) {
                    bail!("SENTRY_DSN is not valid DSN.");
                }
                Some(dsn_string)
            }
            None => {
                warn!("SENTRY_DSN not set.");
                None
            }
        };

        let environment = match var("ENVIRONMENT") {
            Some(v) => v.into(),
            None => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        Ok(Self {
            allowed_origins,
            environment,
            mongodb_uri,
            port,
            request_body_size_limit,
            request_timeout_in_ms,
            sentry_dsn,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(s) => s
            .parse()
            .with_context(|| format!("{key} is not a valid unsigned integer: '{s}'")),
        None => {
            warn!("{key} not set. Defaulting to {default}");
            Ok(default)
        }
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
