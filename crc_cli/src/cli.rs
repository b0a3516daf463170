//! This module implements the commands of the CLI.

use std::{
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crc_core::{
    calendar_resource::CalendarResource,
    feed,
    last_modified::{self, TimestampSlot},
    page::{self, PageArgs, PageConfig, INDEX_PATH, SUBSCRIBE_URL},
    reqwest::{Client, Url},
};
use tracing::{info, warn};

/// Format of ride starts in the inspection report.
static RIDE_FORMAT: &str = "%a %m/%d %I:%M %p";

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the subscription page into the site directory
    Build {
        /// the site directory, the calendar file is expected next to the page
        #[arg(long, env = "CRC_SITE_DIR", default_value = "docs")]
        out: PathBuf,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print when a published calendar was last updated, nothing if that is unknown
    LastUpdated {
        /// the address of the calendar file
        #[arg(default_value = SUBSCRIBE_URL)]
        url: Url,
    },
    /// Print the rides of a calendar file
    Inspect {
        /// the calendar file
        #[arg(default_value = "docs/calendar.ics")]
        path: PathBuf,
    },
}

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Build { out, page } => {
            run_build(&out, &PageConfig::from(&page))?;
        }
        Command::LastUpdated { url } => run_last_updated(url).await,
        Command::Inspect { path } => print!("{}", report(&CalendarResource::new(path))?),
    };
    Ok(())
}

/// Write the page and get its path.
fn run_build(out: &Path, page_config: &PageConfig) -> Result<PathBuf> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let path = out.join(INDEX_PATH);
    fs::write(&path, page::render(page_config))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote page");
    let calendar = CalendarResource::new(out.join(&page_config.calendar_path));
    if !calendar.exists() {
        warn!(
            path = %calendar.path().display(),
            "calendar file not found, the download link is broken until it is generated"
        );
    }
    Ok(path)
}

async fn run_last_updated(url: Url) {
    if let TimestampSlot::Displayed(text) = last_modified::probe(&Client::new(), url).await {
        println!("{text}");
    }
}

/// Describe the calendar file and its rides in start order.
fn report(calendar: &CalendarResource) -> Result<String> {
    let feed = feed::parse(&calendar.read_to_string()?)
        .with_context(|| format!("failed to parse {}", calendar.path().display()))?;
    let mut report = String::new();
    writeln!(
        report,
        "{}",
        feed.name.as_deref().unwrap_or("Unnamed calendar")
    )?;
    if let Some(timezone) = &feed.timezone {
        writeln!(report, "Timezone: {timezone}")?;
    }
    if let Ok(modified) = calendar.last_modified() {
        writeln!(
            report,
            "Last updated: {}",
            last_modified::format_local(&modified)
        )?;
    }
    writeln!(report, "Rides: {}", feed.rides.len())?;
    for ride in feed.rides_in_order() {
        writeln!(report, "{} - {}", ride.start.format(RIDE_FORMAT), ride.summary)?;
        if let Some(url) = &ride.url {
            writeln!(report, "    {url}")?;
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs::{read_to_string, write};

    use clap::Parser;
    use crc_core::{calendar_resource::CalendarResource, page::PageConfig};

    use crate::cli::{report, run_build, Arguments, Command};

    static ICS: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
X-WR-CALNAME:Strava Club Events\r
X-WR-TIMEZONE:America/Los_Angeles\r
BEGIN:VEVENT\r
SUMMARY:Thursday Hill Repeats\r
DTSTART;TZID=America/Los_Angeles:20250109T173000\r
URL:https://www.strava.com/clubs/5678/group_events/555003\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Tuesday Dawn Patrol\r
DTSTART;TZID=America/Los_Angeles:20250107T060000\r
END:VEVENT\r
END:VCALENDAR\r
";

    #[test]
    fn test_arguments() {
        let args = Arguments::try_parse_from(["crc_cli", "build", "--out", "public"]).unwrap();
        let Command::Build { out, page } = args.command else {
            panic!("expected the build command");
        };
        assert_eq!(out.to_str(), Some("public"));
        assert_eq!(PageConfig::from(&page), PageConfig::default());

        let args = Arguments::try_parse_from(["crc_cli", "last-updated"]).unwrap();
        let Command::LastUpdated { url } = args.command else {
            panic!("expected the last-updated command");
        };
        assert_eq!(url.path(), "/strava-club-ride-calendar/calendar.ics");

        assert!(Arguments::try_parse_from(["crc_cli", "last-updated", "not a url"]).is_err());
    }

    #[test]
    fn test_build() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("docs");
        let page_config = PageConfig {
            title: String::from("Morning Rides"),
            ..PageConfig::default()
        };
        let path = run_build(&out, &page_config).unwrap();
        assert_eq!(path, out.join("index.html"));
        let page = read_to_string(path).unwrap();
        assert!(page.contains("<h1>Morning Rides</h1>"));
        assert!(page.contains(r#"<span id="last-updated"></span>"#));

        // a rebuild overwrites the page
        run_build(&out, &PageConfig::default()).unwrap();
        let page = read_to_string(out.join("index.html")).unwrap();
        assert!(page.contains("<h1>Strava Club Ride Calendar</h1>"));
    }

    #[test]
    fn test_report() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = CalendarResource::in_dir(dir.path());
        write(calendar.path(), ICS).unwrap();
        let report = report(&calendar).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Strava Club Events");
        assert_eq!(lines[1], "Timezone: America/Los_Angeles");
        assert!(lines[2].starts_with("Last updated: "));
        assert_eq!(
            &lines[3..],
            [
                "Rides: 2",
                "Tue 01/07 06:00 AM - Tuesday Dawn Patrol",
                "Thu 01/09 05:30 PM - Thursday Hill Repeats",
                "    https://www.strava.com/clubs/5678/group_events/555003",
            ]
        );
    }

    #[test]
    fn test_report_missing_calendar() {
        let dir = tempfile::tempdir().unwrap();
        assert!(report(&CalendarResource::in_dir(dir.path())).is_err());
    }
}
