//! Resource paths with caller-supplied segments
//!
//! Literal segments come from the static operation catalog and are emitted
//! verbatim. Caller-supplied segments (realm names, character names, ids)
//! are percent-encoded so spaces, apostrophes and non-ASCII names survive.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Value(String),
}

/// Path below the service base URL, rendered as `/a/b/c`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePath {
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl ResourcePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal segment from the catalog.
    #[must_use]
    pub fn literal(mut self, segment: &'static str) -> Self {
        self.segments.push(Segment::Literal(segment));
        self
    }

    /// Append a caller-supplied segment (encoded when rendered).
    #[must_use]
    pub fn value(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(Segment::Value(segment.into()));
        self
    }

    /// Keep a trailing `/` (some list endpoints are declared that way).
    #[must_use]
    pub fn with_trailing_slash(mut self) -> Self {
        self.trailing_slash = true;
        self
    }

    /// Encoded path, always starting with `/`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            let encoded: Cow<'_, str> = match segment {
                Segment::Literal(s) => Cow::Borrowed(*s),
                Segment::Value(s) => urlencoding::encode(s),
            };
            out.push_str(&encoded);
        }
        if self.trailing_slash || out.is_empty() {
            out.push('/');
        }
        out
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
