use thiserror::Error;

use crate::dictionary::DictionaryError;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dictionary source error: {0}")]
    Source(String),

    #[error("preference store error: {0}")]
    Store(String),
}
