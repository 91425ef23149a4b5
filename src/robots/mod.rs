//! Robots.txt handling module
//!
//! robots.txt is fetched once per crawl through the crawler's [`Fetcher`].
//! It is best-effort: any failure to fetch it allows every URL.

mod parser;

pub use parser::RobotsRules;

use crate::crawler::Fetcher;
use url::Url;

/// Location of robots.txt for the origin of `base`
pub fn robots_url(base: &Url) -> Option<Url> {
    base.join("/robots.txt").ok()
}

/// Fetches and parses robots.txt for the origin of `base`
pub async fn fetch_robots<F>(fetcher: &F, base: &Url) -> RobotsRules
where
    F: Fetcher + ?Sized,
{
    let Some(url) = robots_url(base) else {
        return RobotsRules::allow_all();
    };

    match fetcher.fetch_text(url.as_str()).await {
        Ok(body) => {
            tracing::debug!("Loaded robots.txt from {}", url);
            RobotsRules::from_content(&body)
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt at {}: {}", url, e);
            RobotsRules::allow_all()
        }
    }
}
