//! Serve the subscription page together with the calendar file it links to.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use crc_core::{
    calendar_resource::CalendarResource,
    page::{PageArgs, PageConfig},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod route;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Arguments {
    /// the socket address to listen on
    #[arg(long, env = "CRC_ADDR", default_value = "0.0.0.0:8008")]
    pub address: SocketAddr,
    /// the directory holding calendar.ics
    #[arg(long, env = "CRC_SITE_DIR", default_value = "docs")]
    pub site_dir: PathBuf,
    #[command(flatten)]
    pub page: PageArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crc_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Arguments::parse();
    let calendar = CalendarResource::in_dir(&args.site_dir);
    match calendar.http_date() {
        Ok(last_modified) => info!(
            path = %calendar.path().display(),
            %last_modified,
            "serving calendar"
        ),
        Err(err) => warn!(
            path = %calendar.path().display(),
            "calendar not readable, it will be served as not found: {err:#}"
        ),
    }

    let app = route::router(&args.site_dir, &PageConfig::from(&args.page));
    info!("listening on http://{}", args.address);
    axum::Server::bind(&args.address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crc_core::page::{PageConfig, CALENDAR_PATH};

    use crate::Arguments;

    #[test]
    fn test_arguments() {
        let args = Arguments::try_parse_from([
            "crc_server",
            "--address",
            "127.0.0.1:9000",
            "--site-dir",
            "public",
            "--title",
            "Morning Rides",
        ])
        .unwrap();
        assert_eq!(args.address.port(), 9000);
        assert_eq!(args.site_dir.to_str(), Some("public"));
        let page_config = PageConfig::from(&args.page);
        assert_eq!(page_config.title, "Morning Rides");
        assert_eq!(page_config.subscribe_url, crc_core::page::SUBSCRIBE_URL);
        assert_eq!(page_config.calendar_path, CALENDAR_PATH);
    }
}
