#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Question not found with id: {0}")]
    NotFound(i64),
    // Froms
    #[error("{0}")]
    Store(#[from] store::Error),
}
