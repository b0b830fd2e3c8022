use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`, matches exactly one segment
    Wildcard,
}

/// A `/`-delimited route pattern where `*` stands for any single segment.
///
/// A pattern matches a path iff both have the same number of segments and
/// every literal segment equals the path segment at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "*" => Segment::Wildcard,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.segments.len() == path.len()
            && self.segments.iter().zip(path).all(|(segment, part)| match segment {
                Segment::Wildcard => true,
                Segment::Literal(literal) => literal == part.as_ref(),
            })
    }

    /// Values captured by the wildcards, in order
    pub fn captures<'a, S: AsRef<str>>(&self, path: &'a [S]) -> Option<Vec<&'a str>> {
        if !self.matches(path) {
            return None;
        }
        Some(
            self.segments
                .iter()
                .zip(path)
                .filter(|(segment, _)| matches!(segment, Segment::Wildcard))
                .map(|(_, part)| part.as_ref())
                .collect(),
        )
    }

    /// Number of non-wildcard segments; more literals means more specific
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// Same segments, regardless of how the source was spelled (`/a/*` vs `a/*`)
    pub fn is_equivalent(&self, other: &RoutePattern) -> bool {
        self.segments == other.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        RoutePattern::parse(pattern)
    }
}
