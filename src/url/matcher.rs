use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Compiled include/exclude admission rules
///
/// A URL is admitted only if it matches at least one include pattern and
/// no exclude pattern. Patterns are regexes matched against the full URL.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl UrlFilter {
    /// Compiles the include and exclude pattern lists
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first pattern that does
    /// not compile.
    pub fn new<I, E>(include: I, exclude: E) -> ConfigResult<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            include: compile_patterns(include)?,
            exclude: compile_patterns(exclude)?,
        })
    }

    /// Returns true if the URL may be crawled
    ///
    /// # Examples
    ///
    /// ```
    /// use docweave::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new([r"/docs(/|$)"], [r"\.pdf$"]).unwrap();
    /// assert!(filter.admits("https://example.com/docs/intro"));
    /// assert!(!filter.admits("https://example.com/docs/manual.pdf"));
    /// assert!(!filter.admits("https://example.com/blog/post"));
    /// ```
    pub fn admits(&self, url: &str) -> bool {
        self.include.iter().any(|re| re.is_match(url))
            && !self.exclude.iter().any(|re| re.is_match(url))
    }
}

/// Compiles a list of regex patterns
pub fn compile_patterns<P>(patterns: P) -> ConfigResult<Vec<Regex>>
where
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| {
            let p = p.as_ref();
            Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
        })
        .collect()
}
