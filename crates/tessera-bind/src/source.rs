//! Alternate value sources and their resolution order.
//!
//! A [`SourceKind`] names one channel a tagged field can be filled from. Each
//! kind has a stateless extraction function; a [`SourceResolver`] holds the
//! caller's ordered list of them and returns the first non-empty value.

use crate::context::BindRequest;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Pure lookup of one parameter in one request channel.
pub type ExtractFn = for<'r> fn(&str, &'r dyn BindRequest) -> Option<Cow<'r, str>>;

/// A request channel that can supply tagged field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Request headers, matched case-insensitively.
    Headers,
    /// URL query parameters.
    Query,
    /// Path variables captured by the router.
    PathVariables,
}

impl SourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [SourceKind; 3] = [Self::Headers, Self::Query, Self::PathVariables];

    /// Canonical token for this kind.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::Query => "query",
            Self::PathVariables => "path-variables",
        }
    }

    /// Returns the extraction function for this kind.
    #[must_use]
    pub fn extractor(self) -> ExtractFn {
        match self {
            Self::Headers => extract_header,
            Self::Query => extract_query,
            Self::PathVariables => extract_path_variable,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error for a token that names no [`SourceKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source kind: {0}")]
pub struct UnknownSourceKind(pub String);

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headers" | "header" | "parse_headers" => Ok(Self::Headers),
            "query" | "parse_query" => Ok(Self::Query),
            "path-variables" | "path_variables" | "path" | "parse_path_variables" => {
                Ok(Self::PathVariables)
            }
            _ => Err(UnknownSourceKind(s.to_string())),
        }
    }
}

/// Looks `name` up in the request headers.
pub fn extract_header<'r>(name: &str, request: &'r dyn BindRequest) -> Option<Cow<'r, str>> {
    request.header(name).map(Cow::Borrowed)
}

/// Looks `name` up in the query string.
pub fn extract_query<'r>(name: &str, request: &'r dyn BindRequest) -> Option<Cow<'r, str>> {
    request.query(name)
}

/// Looks `name` up in the router's path variables.
pub fn extract_path_variable<'r>(
    name: &str,
    request: &'r dyn BindRequest,
) -> Option<Cow<'r, str>> {
    request.path_variable(name).map(Cow::Borrowed)
}

/// A value found by a [`SourceResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<'r> {
    /// The source that supplied the value.
    pub kind: SourceKind,
    /// The raw value.
    pub value: Cow<'r, str>,
}

/// Ordered list of extraction functions, first non-empty match wins.
///
/// # Example
///
/// ```rust
/// use tessera_bind::{BindContext, SourceKind, SourceResolver};
/// use http::Uri;
///
/// let ctx = BindContext::builder()
///     .uri(Uri::from_static("/?user_id=from-query"))
///     .path_var("user_id", "from-path")
///     .build();
///
/// let resolver = SourceResolver::new(&[SourceKind::PathVariables, SourceKind::Query]);
/// let found = resolver.resolve("user_id", &ctx).unwrap();
///
/// assert_eq!(found.kind, SourceKind::PathVariables);
/// assert_eq!(found.value, "from-path");
/// ```
#[derive(Clone, Default)]
pub struct SourceResolver {
    sources: Vec<(SourceKind, ExtractFn)>,
}

impl SourceResolver {
    /// Builds a resolver trying `kinds` in the given order.
    ///
    /// Repeated kinds are kept; they never change the result.
    #[must_use]
    pub fn new(kinds: &[SourceKind]) -> Self {
        Self {
            sources: kinds.iter().map(|kind| (*kind, kind.extractor())).collect(),
        }
    }

    /// Builds a resolver from textual tokens, skipping unknown ones.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources = tokens
            .into_iter()
            .filter_map(|token| match token.as_ref().parse::<SourceKind>() {
                Ok(kind) => Some((kind, kind.extractor())),
                Err(err) => {
                    tracing::warn!(token = token.as_ref(), "ignoring {err}");
                    None
                }
            })
            .collect();
        Self { sources }
    }

    /// Returns true when no source is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns the number of declared sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Iterates over the declared kinds in precedence order.
    pub fn kinds(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.sources.iter().map(|(kind, _)| *kind)
    }

    /// Returns the first non-empty value for `name`.
    ///
    /// Sources after the first match are not consulted.
    pub fn resolve<'r>(&self, name: &str, request: &'r dyn BindRequest) -> Option<Resolved<'r>> {
        self.sources.iter().find_map(|(kind, extract)| {
            extract(name, request)
                .filter(|value| !value.is_empty())
                .map(|value| Resolved { kind: *kind, value })
        })
    }
}

impl fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
