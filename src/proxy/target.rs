//! Outbound URL construction.

use std::fmt;

/// The wildcard part of an inbound path, as raw (still percent-encoded)
/// segments in their original order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WildcardPath(Vec<String>);

impl WildcardPath {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Extract the segments following `prefix` in a raw request path.
    ///
    /// Returns `None` when `path` is not under `prefix`; `/api` does not
    /// match `/apis/files`.
    pub fn under_prefix(path: &str, prefix: &str) -> Option<Self> {
        let rest = path.strip_prefix(prefix)?;
        if rest.is_empty() {
            return Some(Self::default());
        }
        let rest = rest.strip_prefix('/')?;
        if rest.is_empty() {
            return Some(Self::default());
        }
        Some(Self::from_segments(rest.split('/')))
    }

    /// Segments joined with `/`.
    pub fn joined(&self) -> String {
        self.0.join("/")
    }
}

/// Where a forwarded request goes: backend origin, wildcard path, raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget<'a> {
    origin: &'a str,
    path: WildcardPath,
    query: Option<&'a str>,
}

impl<'a> ForwardTarget<'a> {
    /// `origin` is expected without a trailing slash.
    pub fn new(origin: &'a str, path: WildcardPath, query: Option<&'a str>) -> Self {
        Self {
            origin,
            path,
            query: query.filter(|q| !q.is_empty()),
        }
    }
}

impl fmt::Display for ForwardTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.origin, self.path.joined())?;
        if let Some(query) = self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}
