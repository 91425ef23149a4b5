//! Robots.txt rules
//!
//! Allow/disallow matching is delegated to the robotstxt crate; the
//! `Sitemap` and `Crawl-delay` directives are read directly.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Rules parsed from one robots.txt file
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    /// Raw robots.txt content; empty allows everything
    content: String,
}

impl RobotsRules {
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow every URL (used when robots.txt is unavailable)
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks whether `url` may be fetched by the crawler named `agent`
    ///
    /// # Examples
    ///
    /// ```
    /// use docweave::robots::RobotsRules;
    ///
    /// let rules = RobotsRules::from_content("User-agent: *\nDisallow: /docs/internal");
    /// assert!(rules.is_allowed("https://x.com/docs/public", "Docweave"));
    /// assert!(!rules.is_allowed("https://x.com/docs/internal/a", "Docweave"));
    /// ```
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent, url)
    }

    /// URLs declared with `Sitemap:` directives
    pub fn sitemaps(&self) -> Vec<String> {
        self.directives()
            .filter(|(key, _)| key == "sitemap")
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// The `Crawl-delay` that applies to `agent`
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, agent: &str) -> Option<Duration> {
        let agent = agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut group_open = false;
        let mut for_agent = None;
        let mut for_wildcard = None;

        for (key, value) in self.directives() {
            match key.as_str() {
                "user-agent" => {
                    if !group_open {
                        group.clear();
                        group_open = true;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_open = false;
                    let Ok(seconds) = value.parse::<f64>() else {
                        continue;
                    };
                    if seconds < 0.0 || !seconds.is_finite() {
                        continue;
                    }
                    if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                        for_agent = Some(seconds);
                    } else if group.iter().any(|ua| ua == "*") {
                        for_wildcard = Some(seconds);
                    }
                }
                _ => group_open = false,
            }
        }

        for_agent.or(for_wildcard).map(Duration::from_secs_f64)
    }

    fn directives(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.content.lines().filter_map(|line| {
            let line = line.split('#').next().unwrap_or("").trim();
            let (key, value) = line.split_once(':')?;
            Some((key.trim().to_lowercase(), value.trim()))
        })
    }
}
