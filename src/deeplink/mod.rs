//! Deep links: external locators resolved into path components and parameters.
//!
//! A [`Locator`] is the raw URL-like input (`scheme://host/path?query`). The
//! host never contributes path components, so `app://host/profile/7` and
//! `https://example.com/profile/7` both resolve to `["profile", "7"]`.

pub mod pattern;
pub mod registry;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use pattern::RoutePattern;
pub use registry::{DeepLinkHandler, DeepLinkRegistry};

/// Parsed URL-like input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Lowercased scheme, e.g. `app` or `https`
    pub scheme: String,
    /// Lowercased host without userinfo or port
    pub host: Option<String>,
    /// Percent-decoded, non-empty path segments
    pub segments: Vec<String>,
    /// Percent-decoded query parameters, last value wins
    pub query: BTreeMap<String, String>,
}

impl Locator {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (scheme, rest) = input
            .split_once(':')
            .with_context(|| format!("Missing scheme in locator '{}'", input))?;

        if !is_valid_scheme(scheme) {
            bail!("Invalid scheme '{}' in locator '{}'", scheme, input);
        }

        // Fragments never take part in routing
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let (rest, query) = match rest.split_once('?') {
            Some((before, query)) => (before, Some(query)),
            None => (rest, None),
        };

        let (host, path) = match rest.strip_prefix("//") {
            Some(authority_and_path) => {
                let (authority, path) = match authority_and_path.find('/') {
                    Some(index) => authority_and_path.split_at(index),
                    None => (authority_and_path, ""),
                };
                (parse_host(authority), path)
            }
            None => (None, rest),
        };

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            host,
            segments: split_path(path),
            query: query.map(parse_query).unwrap_or_default(),
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.host.as_deref().unwrap_or(""), self.segments.join("/"))?;
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
                .collect();
            write!(f, "?{}", query.join("&"))?;
        }
        Ok(())
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn parse_host(authority: &str) -> Option<String> {
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    // Strip a trailing port; bracketed IPv6 literals end in ']' and are left alone
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| component.to_string())
}

/// Split on `/`, dropping empty segments
pub(crate) fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(decode)
        .collect()
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    let mut parameters = BTreeMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        // Form encoding uses '+' for spaces
        let key = decode(&key.replace('+', " "));
        let value = decode(&value.replace('+', " "));
        parameters.insert(key, value);
    }
    parameters
}

/// Ordered path components plus query parameters, the unit handed to
/// screen factories and registry handlers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeepLink {
    components: Vec<String>,
    parameters: BTreeMap<String, String>,
}

impl DeepLink {
    pub fn new(components: Vec<String>, parameters: BTreeMap<String, String>) -> Self {
        Self { components, parameters }
    }

    /// Deep link from a bare path such as `"profile/42/edit"`, without parameters
    pub fn from_path(path: &str) -> Self {
        Self {
            components: split_path(path),
            parameters: BTreeMap::new(),
        }
    }

    pub fn from_locator(locator: &Locator) -> Self {
        Self {
            components: locator.segments.clone(),
            parameters: locator.query.clone(),
        }
    }

    /// Parse a full URL straight into a deep link
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::from_locator(&Locator::parse(url)?))
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&str> {
        self.components.get(index).map(String::as_str)
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The first `len` components, keeping every parameter
    pub fn prefix(&self, len: usize) -> DeepLink {
        DeepLink {
            components: self.components.iter().take(len).cloned().collect(),
            parameters: self.parameters.clone(),
        }
    }

    /// Everything after the first `count` components, keeping every parameter
    pub fn skip(&self, count: usize) -> DeepLink {
        DeepLink {
            components: self.components.iter().skip(count).cloned().collect(),
            parameters: self.parameters.clone(),
        }
    }

    /// Components joined with `/`
    pub fn path(&self) -> String {
        self.components.join("/")
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())?;
        if !self.parameters.is_empty() {
            let query: Vec<String> = self.parameters.iter().map(|(key, value)| format!("{}={}", key, value)).collect();
            write!(f, "?{}", query.join("&"))?;
        }
        Ok(())
    }
}
