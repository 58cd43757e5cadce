use axum::{
    body::Bytes,
    extract::State,
    http::Uri,
    response::{Html, IntoResponse},
};

use crate::{error::ApiError, state::AppState};

#[tracing::instrument(skip(state))]
pub async fn get_home(State(state): State<AppState>) -> Html<Bytes> {
    Html(state.page.clone())
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    ApiError::NotFound(uri.path().to_owned())
}
