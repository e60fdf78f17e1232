use thiserror::Error;

/// Errors from turning a completion reply into criteria
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API error: {0}")]
    Api(String),

    #[error("Completion returned no content")]
    EmptyReply,

    #[error("No JSON object in completion: {0}")]
    NoJson(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Errors from reading configuration out of the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
