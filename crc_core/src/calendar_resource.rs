//! The calendar file as published next to the page.
//!
//! The file is written by an external generator, it is only read here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

use crate::page::CALENDAR_PATH;

/// Format of an HTTP date (IMF-fixdate), always in GMT.
pub static HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarResource {
    path: PathBuf,
}

impl CalendarResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The calendar file inside a site directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CALENDAR_PATH))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Get the last modification time, truncated to whole seconds like HTTP dates are.
    pub fn last_modified(&self) -> Result<DateTime<Utc>> {
        let modified = fs::metadata(&self.path)
            .and_then(|metadata| metadata.modified())
            .with_context(|| {
                format!("failed to read modification time of {}", self.path.display())
            })?;
        let modified = DateTime::<Utc>::from(modified);
        Utc.timestamp_opt(modified.timestamp(), 0)
            .single()
            .context("modification time out of range")
    }

    /// Get the value of the `Last-Modified` header for this file.
    pub fn http_date(&self) -> Result<String> {
        Ok(http_date(&self.last_modified()?))
    }

    pub fn read_to_string(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
    }
}

/// Format a time as an HTTP date.
pub fn http_date(time: &DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use std::fs::{write, File};

    use chrono::{TimeZone, Utc};

    use crate::calendar_resource::{http_date, CalendarResource};

    #[test]
    fn test_http_date() {
        let time = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(http_date(&time), "Wed, 01 Jan 2025 12:00:00 GMT");
        let time = Utc.with_ymd_and_hms(2024, 11, 9, 6, 5, 4).unwrap();
        assert_eq!(http_date(&time), "Sat, 09 Nov 2024 06:05:04 GMT");
    }

    #[test]
    fn test_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let resource = CalendarResource::in_dir(dir.path());
        assert_eq!(resource.path(), dir.path().join("calendar.ics"));
        assert!(!resource.exists());
        assert!(resource.last_modified().is_err());
        assert!(resource.http_date().is_err());
    }

    #[test]
    fn test_last_modified() {
        let dir = tempfile::tempdir().unwrap();
        let resource = CalendarResource::in_dir(dir.path());
        write(resource.path(), "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();
        let modified = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        File::options()
            .write(true)
            .open(resource.path())
            .unwrap()
            .set_modified(modified.into())
            .unwrap();
        assert!(resource.exists());
        assert_eq!(resource.last_modified().unwrap(), modified);
        assert_eq!(resource.http_date().unwrap(), "Wed, 01 Jan 2025 12:00:00 GMT");
        assert_eq!(
            resource.read_to_string().unwrap(),
            "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"
        );
    }
}
