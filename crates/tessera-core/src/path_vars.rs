//! Path variable storage.
//!
//! A router that matched a request against a pattern such as
//! `/users/{user_id}` records the captured segments in a [`PathVars`] value
//! and attaches it to the request (for `http::Request` through its
//! extensions). The binder reads it through an explicit accessor.

use smallvec::SmallVec;

/// Number of variables stored inline before spilling to the heap.
const INLINE_VARS: usize = 4;

/// Path variables captured by a router for one request.
///
/// Variables are kept in capture order as (name, value) pairs. Lookups return
/// the first pair with a matching name.
///
/// # Example
///
/// ```rust
/// use tessera_core::PathVars;
///
/// let mut vars = PathVars::new();
/// vars.push("user_id", "123");
/// vars.push("action", "view");
///
/// assert_eq!(vars.get("user_id"), Some("123"));
/// assert_eq!(vars.get("action"), Some("view"));
/// assert_eq!(vars.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathVars {
    inner: SmallVec<[(String, String); INLINE_VARS]>,
}

impl PathVars {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a captured variable.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over (name, value) pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for PathVars {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let vars = PathVars::new();
        assert!(vars.is_empty());
        assert_eq!(vars.len(), 0);
        assert_eq!(vars.get("id"), None);
    }

    #[test]
    fn test_push_and_get() {
        let mut vars = PathVars::new();
        vars.push("id", "123");
        vars.push("name", "alice");

        assert_eq!(vars.get("id"), Some("123"));
        assert_eq!(vars.get("name"), Some("alice"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_first_capture_wins() {
        let mut vars = PathVars::new();
        vars.push("id", "first");
        vars.push("id", "second");

        assert_eq!(vars.get("id"), Some("first"));
    }

    #[test]
    fn test_iter_keeps_capture_order() {
        let vars: PathVars = [("a", "1"), ("b", "2")].into_iter().collect();

        let pairs: Vec<_> = vars.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let mut vars = PathVars::new();
        for i in 0..10 {
            vars.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(vars.len(), 10);
        assert_eq!(vars.get("key7"), Some("value7"));
    }
}
