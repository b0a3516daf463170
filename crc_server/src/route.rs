pub mod calendar;
pub mod page;

use std::{path::Path, sync::Arc};

use axum::{routing::get, Router};
use crc_core::page::{render, PageConfig};
use tower_http::trace::TraceLayer;

/// Build the router for a site directory.
///
/// The page is rendered once, the calendar file is read from disk on every request.
pub fn router(site_dir: &Path, page_config: &PageConfig) -> Router {
    let rendered = Arc::new(render(page_config));
    Router::new()
        .route("/", get(page::handler))
        .route("/index.html", get(page::handler))
        .route_service(
            &format!("/{}", page_config.calendar_path),
            calendar::service(site_dir, &page_config.calendar_path),
        )
        .with_state(rendered)
        .layer(TraceLayer::new_for_http())
}
