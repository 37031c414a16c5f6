//! Request access for the binder.
//!
//! The binder never touches a server type directly. It reads requests through
//! [`BindRequest`], which exposes exactly the four channels a binding can draw
//! from: the body, headers, the query string and router path variables.
//! [`BindContext`] is an owned implementation with a builder; `http::Request`
//! implements the trait as well, taking its path variables from a
//! [`PathVars`] value stored in the request extensions.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use std::borrow::Cow;
use tessera_core::PathVars;

/// Read access to the parts of a request the binder draws values from.
///
/// Every lookup returns `None` when the request carries no value for `name`.
/// Implementations must not have side effects; the binder may call them any
/// number of times per binding.
pub trait BindRequest {
    /// Raw body bytes.
    fn body(&self) -> &[u8];

    /// Header value by name. Names are matched case-insensitively; values that
    /// are not visible ASCII are treated as absent.
    fn header(&self, name: &str) -> Option<&str>;

    /// First query parameter named `name`, percent-decoded.
    fn query(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Path variable captured by the router.
    fn path_variable(&self, name: &str) -> Option<&str>;
}

/// Looks up the first `name` pair in a raw query string.
pub(crate) fn query_value<'q>(query: Option<&'q str>, name: &str) -> Option<Cow<'q, str>> {
    let query = query?;
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| Cow::Owned(value))
}

/// Owned request parts for binding.
///
/// # Example
///
/// ```rust
/// use tessera_bind::{BindContext, BindRequest};
/// use tessera_core::PathVars;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut vars = PathVars::new();
/// vars.push("id", "123");
///
/// let ctx = BindContext::new(
///     Method::GET,
///     Uri::from_static("/users/123?verbose=true"),
///     HeaderMap::new(),
///     Bytes::new(),
///     vars,
/// );
///
/// assert_eq!(ctx.path_variable("id"), Some("123"));
/// assert_eq!(ctx.query("verbose").as_deref(), Some("true"));
/// ```
#[derive(Debug, Clone)]
pub struct BindContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_vars: PathVars,
}

impl BindContext {
    /// Creates a context from its parts.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_vars: PathVars,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_vars,
        }
    }

    /// Starts a [`BindContextBuilder`].
    #[must_use]
    pub fn builder() -> BindContextBuilder {
        BindContextBuilder::new()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the raw query string, if any.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the captured path variables.
    #[must_use]
    pub fn path_vars(&self) -> &PathVars {
        &self.path_vars
    }
}

impl BindRequest for BindContext {
    fn body(&self) -> &[u8] {
        &self.body
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn query(&self, name: &str) -> Option<Cow<'_, str>> {
        query_value(self.uri.query(), name)
    }

    fn path_variable(&self, name: &str) -> Option<&str> {
        self.path_vars.get(name)
    }
}

impl BindRequest for http::Request<Bytes> {
    fn body(&self) -> &[u8] {
        self.body()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn query(&self, name: &str) -> Option<Cow<'_, str>> {
        query_value(self.uri().query(), name)
    }

    fn path_variable(&self, name: &str) -> Option<&str> {
        self.extensions()
            .get::<PathVars>()
            .and_then(|vars| vars.get(name))
    }
}

/// Builder for [`BindContext`].
///
/// Method defaults to `GET` and the URI to `/`.
#[derive(Debug, Default)]
pub struct BindContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_vars: PathVars,
}

impl BindContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Invalid values are skipped.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Replaces all path variables.
    #[must_use]
    pub fn path_vars(mut self, vars: PathVars) -> Self {
        self.path_vars = vars;
        self
    }

    /// Adds a single path variable.
    #[must_use]
    pub fn path_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_vars.push(name, value);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> BindContext {
        BindContext {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
            path_vars: self.path_vars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let ctx = BindContextBuilder::new().build();

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.uri().path(), "/");
        assert!(ctx.body().is_empty());
        assert!(ctx.path_vars().is_empty());
    }

    #[test]
    fn test_builder_parts() {
        let ctx = BindContext::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/api/users?limit=5"))
            .header("x-request-id", "abc-123")
            .body(r#"{"name": "Alice"}"#)
            .path_var("version", "v1")
            .build();

        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.query_string(), Some("limit=5"));
        assert_eq!(ctx.header("x-request-id"), Some("abc-123"));
        assert_eq!(ctx.body(), br#"{"name": "Alice"}"#);
        assert_eq!(ctx.path_variable("version"), Some("v1"));
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let ctx = BindContext::builder().header("x-user-id", "42").build();

        assert_eq!(ctx.header("X-User-Id"), Some("42"));
        assert_eq!(ctx.header("X-USER-ID"), Some("42"));
        assert_eq!(ctx.header("x-other"), None);
    }

    #[test]
    fn test_header_lookup_with_invalid_name() {
        let ctx = BindContext::builder().header("x-user-id", "42").build();
        assert_eq!(ctx.header("not a header"), None);
    }

    #[test]
    fn test_query_lookup() {
        let ctx = BindContext::builder()
            .uri(Uri::from_static("/search?q=rust%20lang&page=2&page=3"))
            .build();

        assert_eq!(ctx.query("q").as_deref(), Some("rust lang"));
        assert_eq!(ctx.query("page").as_deref(), Some("2"));
        assert_eq!(ctx.query("missing"), None);
    }

    #[test]
    fn test_query_lookup_without_query_string() {
        let ctx = BindContext::builder().uri(Uri::from_static("/search")).build();
        assert_eq!(ctx.query("q"), None);
    }

    #[test]
    fn test_http_request_reads_path_vars_from_extensions() {
        let mut vars = PathVars::new();
        vars.push("user_id", "7");

        let mut request = http::Request::builder()
            .uri("/users/7?expand=profile")
            .header("X-Tenant", "acme")
            .body(Bytes::from_static(b"{}"))
            .unwrap();
        request.extensions_mut().insert(vars);

        assert_eq!(request.path_variable("user_id"), Some("7"));
        assert_eq!(request.header("x-tenant"), Some("acme"));
        assert_eq!(request.query("expand").as_deref(), Some("profile"));
        assert_eq!(BindRequest::body(&request), b"{}");
    }

    #[test]
    fn test_http_request_without_path_vars() {
        let request = http::Request::new(Bytes::new());
        assert_eq!(request.path_variable("user_id"), None);
    }
}
