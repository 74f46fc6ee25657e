#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Counter(String),
    #[error("database needs to be defined in the URI")]
    MissingDatabase,
    // Froms
    #[error("{0}")]
    MongoDB(#[from] mongodb::error::Error),
}
