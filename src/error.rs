use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;

/// Fatal failures of a pipeline run. Any of these aborts startup before
/// the dashboard is served.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("error retrieving {url}")]
    Retrieval {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("source {url} responded with {status}")]
    RetrievalStatus { url: String, status: StatusCode },

    #[error("malformed source data: {0}")]
    MalformedSource(String),

    #[error("error converting {column} on row {row}: {value:?} ({reason})")]
    Conversion {
        column: &'static str,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("amounts in category {category:?} do not fit in a 64-bit total")]
    AmountOverflow { category: String },
}

/// A single malformed line in the source table. Recovered by skipping it.
#[derive(Debug, thiserror::Error)]
#[error("skipping line {line}: {source}")]
pub struct RowParseError {
    pub line: u64,
    #[source]
    pub source: csv::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            ApiError::NotFound(path) => {
                tracing::debug!("not found: {path}");
                (StatusCode::NOT_FOUND, format!("no page at {path}"))
            }
        };

        return (status_code, Json(json!({ "error": error_message }))).into_response();
    }
}
