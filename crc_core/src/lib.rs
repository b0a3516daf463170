//! This crate implements the subscription page of a Strava club ride calendar.
//! It renders the page, reads the metadata of the sibling `calendar.ics` and probes its
//! `Last-Modified` header the same way the page does.
//!
//! The calendar file itself is produced by a separate generator and is only ever read here.

pub use ical;
pub use reqwest;

pub mod calendar_resource;
pub mod feed;
pub mod last_modified;
pub mod page;
