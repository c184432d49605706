use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("page outline parse error: {0}")]
    Outline(#[from] serde_json::Error),

    #[error("invalid tag name `{0}`")]
    InvalidTag(String),
}
