use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed grid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no sheet named `{name}`")]
    MissingSheet { name: String },

    #[error("sheet `{name}` already exists")]
    DuplicateSheet { name: String },
}
