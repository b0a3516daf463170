use std::sync::Arc;

use axum::{extract::State, response::Html};

/// Handle page requests with the page rendered at startup.
pub async fn handler(State(page): State<Arc<String>>) -> Html<String> {
    Html(page.as_ref().clone())
}
