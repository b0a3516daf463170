//! The calendar file is served straight from the site directory.
//!
//! `ServeFile` sets `Content-Type: text/calendar` and `Last-Modified` from the file's
//! modification time, answers conditional requests and returns 404 while the file is missing.

use std::path::Path;

use crc_core::calendar_resource::CalendarResource;
use tower_http::services::ServeFile;

pub fn service(site_dir: &Path, calendar_path: &str) -> ServeFile {
    let calendar = CalendarResource::new(site_dir.join(calendar_path));
    ServeFile::new(calendar.path())
}
