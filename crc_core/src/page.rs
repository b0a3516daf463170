//! The subscription page served next to the calendar file.

use html_escape::{encode_double_quoted_attribute, encode_text};

/// File name of the rendered page inside the site directory.
pub static INDEX_PATH: &str = "index.html";
/// Relative path of the calendar file, next to the page.
pub static CALENDAR_PATH: &str = "calendar.ics";
/// Public address of the calendar file, shown to be pasted into calendar applications.
pub static SUBSCRIBE_URL: &str =
    "https://defeomike.github.io/strava-club-ride-calendar/calendar.ics";
pub static TITLE: &str = "Strava Club Ride Calendar";
/// Id of the element which receives the last modification time of the calendar.
pub static LAST_UPDATED_ID: &str = "last-updated";
/// Id of the download link, the script reads the calendar path from it.
pub static DOWNLOAD_ID: &str = "download";

/// Everything the page can be configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub title: String,
    pub calendar_path: String,
    pub subscribe_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: String::from(TITLE),
            calendar_path: String::from(CALENDAR_PATH),
            subscribe_url: String::from(SUBSCRIBE_URL),
        }
    }
}

/// Command line options of the page, shared by the binaries which render it.
#[cfg(feature = "clap")]
#[derive(Debug, clap::Args)]
pub struct PageArgs {
    /// the page title
    #[arg(long, env = "CRC_TITLE", default_value = TITLE)]
    pub title: String,
    /// the public calendar address shown for subscribing
    #[arg(long, env = "CRC_SUBSCRIBE_URL", default_value = SUBSCRIBE_URL)]
    pub subscribe_url: String,
}

#[cfg(feature = "clap")]
impl From<&PageArgs> for PageConfig {
    fn from(value: &PageArgs) -> Self {
        PageConfig {
            title: value.title.clone(),
            subscribe_url: value.subscribe_url.clone(),
            ..PageConfig::default()
        }
    }
}

/// Render the page.
///
/// The last updated slot is left empty, the inline script fills it after one request for the
/// calendar file. Any failure of that request leaves the slot empty.
pub fn render(config: &PageConfig) -> String {
    let title = encode_text(&config.title);
    let calendar_path = encode_double_quoted_attribute(&config.calendar_path);
    let subscribe_url = encode_text(&config.subscribe_url);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; color: #242428; }}
h1 {{ color: #fc4c02; }}
code {{ background: #f3f3f3; padding: 0.1rem 0.3rem; border-radius: 3px; word-break: break-all; }}
.button {{ display: inline-block; background: #fc4c02; color: #fff; padding: 0.6rem 1.2rem; border-radius: 4px; text-decoration: none; font-weight: bold; }}
.updated {{ color: #6d6d78; font-size: 0.9rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>Upcoming club rides from Strava, ready to subscribe to in your calendar app. Subscribed calendars refresh on their own as new rides are posted.</p>
<p><a id="{DOWNLOAD_ID}" class="button" href="{calendar_path}">Download / Subscribe</a></p>
<p class="updated">Last updated: <span id="{LAST_UPDATED_ID}"></span></p>
<h2>Apple Calendar (iPhone, iPad, Mac)</h2>
<ol>
<li>Open <strong>Settings</strong> &rarr; <strong>Calendar</strong> &rarr; <strong>Accounts</strong> &rarr; <strong>Add Account</strong> &rarr; <strong>Other</strong>.</li>
<li>Tap <strong>Add Subscribed Calendar</strong>.</li>
<li>Paste this address: <code>{subscribe_url}</code></li>
<li>Tap <strong>Next</strong>, then <strong>Save</strong>.</li>
</ol>
<p>On a Mac, choose <strong>File</strong> &rarr; <strong>New Calendar Subscription</strong> in the Calendar app and paste the same address.</p>
<h2>Google Calendar</h2>
<ol>
<li>Open <a href="https://calendar.google.com">calendar.google.com</a> on a computer.</li>
<li>Next to <strong>Other calendars</strong>, click <strong>+</strong> and choose <strong>From URL</strong>.</li>
<li>Paste this address: <code>{subscribe_url}</code></li>
<li>Click <strong>Add calendar</strong>. The calendar shows up on your phone after the next sync.</li>
</ol>
<p>Google refreshes subscribed calendars every few hours, so new rides may take a while to appear.</p>
<h2>Other calendar apps</h2>
<p>Look for an option called <em>Subscribe</em>, <em>Add calendar from URL</em> or <em>Internet calendar</em> and paste <code>{subscribe_url}</code>. If your app can only import files, use the download link above, but an imported file will not receive updates.</p>
<h2>About</h2>
<p>Rides are collected from the clubs' Strava event pages and cover the next four weeks. Every calendar entry starts 30 minutes before the ride, leaving time to get to the meeting point. Check the Strava event for last minute changes.</p>
<script>
(async () => {{
  try {{
    const href = document.getElementById("{DOWNLOAD_ID}").getAttribute("href");
    const response = await fetch(href);
    const lastModified = response.headers.get("Last-Modified");
    if (!response.ok || !lastModified) return;
    const date = new Date(lastModified);
    if (isNaN(date.getTime())) return;
    document.getElementById("{LAST_UPDATED_ID}").textContent = date.toLocaleString();
  }} catch (error) {{}}
}})();
</script>
</body>
</html>
"#
    )
}
