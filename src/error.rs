use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DirectoryError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("S3 bucket error: {0}")]
    S3Bucket(#[from] rusty_s3::BucketError),

    #[error("AWS credentials not found")]
    MissingCredentials,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Connection retry policy allows zero attempts")]
    NoConnectionAttempts,

    #[error("Database unreachable after {attempts} attempts: {last_error}")]
    ConnectionExhausted { attempts: u32, last_error: String },

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<figment::Error> for DirectoryError {
    fn from(e: figment::Error) -> Self {
        DirectoryError::Config(Box::new(e))
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Internal Server Error</h1>".to_string()),
        )
            .into_response()
    }
}
