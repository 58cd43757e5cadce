use axum::body::Bytes;

/// Read-only state shared by the handlers. The page is rendered once at
/// startup and never changes afterwards.
#[derive(Clone)]
pub struct AppState {
    pub page: Bytes,
}
