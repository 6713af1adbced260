//! Framework-independent helpers for locations (`/path?query#fragment`).

use url::{form_urlencoded, Url};

/// A location split into its path and raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Accepts absolute URLs (`https://host/stripe?code=x`) as well as
    /// app-relative locations (`/stripe?code=x`). Fragments are dropped.
    pub fn parse(location: &str) -> Self {
        if let Ok(url) = Url::parse(location) {
            return Self {
                path: url.path().to_string(),
                query: url.query().map(str::to_string),
            };
        }

        let without_fragment = location.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (without_fragment, None),
        };
        Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
        }
    }

    /// First non-empty value of `name` in the query string.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Value of the query parameter `name` in `url`, or `None` when it is absent or empty.
pub fn parse_query_param(url: &str, name: &str) -> Option<String> {
    Location::parse(url).query_param(name)
}

/// Append `flag=true` to `path`, keeping any query it already has.
pub fn with_query_flag(path: &str, flag: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}=true", path, separator, flag)
}
