//! Read the published calendar file to see what it currently offers.

use std::io::{BufReader, Cursor};

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use ical::{
    parser::ical::component::{IcalCalendar, IcalEvent},
    property::Property,
    IcalParser,
};

static DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
static DATE_FORMAT: &str = "%Y%m%d";

/// One ride from the calendar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ride {
    pub summary: String,
    /// Start with the offset it has in its own timezone, so rides from different zones compare
    /// correctly while keeping their wall-clock time.
    pub start: DateTime<FixedOffset>,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// This is the data which can be extracted from the calendar file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub rides: Vec<Ride>,
}

impl FeedSummary {
    pub fn rides_in_order(&self) -> Vec<&Ride> {
        let mut rides: Vec<&Ride> = self.rides.iter().collect();
        rides.sort_by_key(|ride| ride.start);
        rides
    }
}

trait GetIcalProperty {
    fn properties(&self) -> &[Property];

    fn get_ical_property(&self, name: &str) -> Option<&Property> {
        self.properties()
            .iter()
            .find(|property| property.name == name)
    }

    fn get_ical_property_value(&self, name: &str) -> Option<&String> {
        self.get_ical_property(name)
            .and_then(|property| property.value.as_ref())
    }
}

impl GetIcalProperty for IcalCalendar {
    fn properties(&self) -> &[Property] {
        &self.properties
    }
}

impl GetIcalProperty for IcalEvent {
    fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// Parse the calendar file.
///
/// Events without a summary or a readable start are skipped.
pub fn parse(ics: &str) -> Result<FeedSummary> {
    let parser = IcalParser::new(BufReader::new(Cursor::new(ics)));
    let mut feed = FeedSummary::default();
    for ical_calendar_result in parser {
        let ical_calendar = ical_calendar_result?;
        if feed.name.is_none() {
            feed.name = ical_calendar
                .get_ical_property_value("X-WR-CALNAME")
                .map(|name| unescape(name));
        }
        if feed.timezone.is_none() {
            feed.timezone = ical_calendar.get_ical_property_value("X-WR-TIMEZONE").cloned();
        }
        let feed_timezone = feed
            .timezone
            .as_deref()
            .and_then(|timezone| timezone.parse::<Tz>().ok());
        for ical_event in &ical_calendar.events {
            let summary_option = ical_event.get_ical_property_value("SUMMARY");
            let start_option = ical_event
                .get_ical_property("DTSTART")
                .and_then(|dt_start| parse_start(dt_start, feed_timezone));
            let (Some(summary), Some(start)) = (summary_option, start_option) else {
                continue;
            };
            feed.rides.push(Ride {
                summary: unescape(summary),
                start,
                url: ical_event.get_ical_property_value("URL").cloned(),
                description: ical_event
                    .get_ical_property_value("DESCRIPTION")
                    .map(|description| unescape(description)),
            });
        }
    }
    Ok(feed)
}

/// Parse a `DTSTART` property, either a date-time or an all-day date starting at midnight.
///
/// Values ending in `Z` are UTC. Other values are local to the `TZID` parameter, else to the
/// calendar's timezone, else they are taken as UTC.
fn parse_start(property: &Property, feed_timezone: Option<Tz>) -> Option<DateTime<FixedOffset>> {
    let value = property.value.as_deref()?.trim();
    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, DATE_TIME_FORMAT).ok()?;
        return Some(Utc.from_utc_datetime(&naive).into());
    }
    let naive = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    match tzid(property).or(feed_timezone) {
        // a skipped wall-clock time has no start, an ambiguous one takes the earlier
        Some(timezone) => timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|start| start.with_timezone(&start.offset().fix())),
        None => Some(Utc.from_utc_datetime(&naive).into()),
    }
}

fn tzid(property: &Property) -> Option<Tz> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(name, _)| name == "TZID")?
        .1
        .first()?
        .parse()
        .ok()
}

/// Undo the escaping of iCalendar text values.
fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => unescaped.push('\n'),
            Some(escaped) => unescaped.push(escaped),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
