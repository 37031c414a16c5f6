//! The binding pipeline.
//!
//! A binding runs in two phases. The body is decoded into the target first;
//! then every tagged field is walked depth-first and overwritten with the
//! first non-empty value the declared sources supply. The first failure in
//! either phase aborts the binding.

use crate::body::{decode_body, DEFAULT_MAX_BODY_BYTES};
use crate::coerce::LeafTarget;
use crate::config::{BindConfig, MissingValuePolicy};
use crate::context::BindRequest;
use crate::source::{SourceKind, SourceResolver};
use crate::walk::{Bindable, FieldSlot, FieldVisitor};
use crate::BindError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Binds request data into targets.
///
/// A `Binder` holds the ordered source list and the binding policy. It keeps
/// no per-request state and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use tessera_bind::{Bind, BindContext, Binder, SourceKind};
/// use serde::{Deserialize, Serialize};
/// use http::Uri;
///
/// #[derive(Debug, Default, Deserialize, Serialize, Bind)]
/// struct GetUser {
///     #[bind(param = "user_id")]
///     user_id: String,
///     verbose: bool,
/// }
///
/// let binder = Binder::new(&[SourceKind::PathVariables, SourceKind::Query]);
/// let ctx = BindContext::builder()
///     .uri(Uri::from_static("/users/42?user_id=ignored"))
///     .path_var("user_id", "42")
///     .body(r#"{"verbose": true}"#)
///     .build();
///
/// let request: GetUser = binder.bind(&ctx).unwrap();
/// assert_eq!(request.user_id, "42");
/// assert!(request.verbose);
/// ```
#[derive(Debug, Clone)]
pub struct Binder {
    resolver: SourceResolver,
    policy: MissingValuePolicy,
    max_body_bytes: usize,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Binder {
    /// Creates a binder trying `sources` in the given order.
    #[must_use]
    pub fn new(sources: &[SourceKind]) -> Self {
        Self::with_resolver(SourceResolver::new(sources))
    }

    /// Creates a binder from textual source tokens. Unknown tokens are
    /// skipped with a warning.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_resolver(SourceResolver::from_tokens(tokens))
    }

    /// Creates a binder from a loaded configuration, sources included.
    #[must_use]
    pub fn from_config(config: &BindConfig) -> Self {
        Self::from_tokens(&config.sources).with_config(config)
    }

    fn with_resolver(resolver: SourceResolver) -> Self {
        Self {
            resolver,
            policy: MissingValuePolicy::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Applies the policy and body limit of `config`, keeping the sources.
    #[must_use]
    pub fn with_config(mut self, config: &BindConfig) -> Self {
        self.policy = config.missing_value;
        self.max_body_bytes = config.max_body_bytes;
        self
    }

    /// Sets the missing-value policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MissingValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the largest body the decoder accepts.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Returns the source resolver.
    #[must_use]
    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// Returns the missing-value policy.
    #[must_use]
    pub fn policy(&self) -> MissingValuePolicy {
        self.policy
    }

    /// Returns the body size limit.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Decodes the body into a new `T` and fills its tagged fields.
    ///
    /// Fields the body leaves out keep their `T::default()` value. A body
    /// that cannot be decoded is fatal only when no source is declared;
    /// otherwise binding starts from `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] raised by the body decoder or the
    /// field walk. No partially bound target is returned.
    pub fn bind<T>(&self, request: &dyn BindRequest) -> Result<T, BindError>
    where
        T: Bindable + Serialize + DeserializeOwned + Default,
    {
        let mut target = match decode_body::<T>(request.body(), self.max_body_bytes) {
            Ok(target) => target,
            Err(err) if self.resolver.is_empty() => return Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "body not decoded, binding from sources only");
                T::default()
            }
        };

        self.populate(&mut target, request)?;
        Ok(target)
    }

    /// Fills the tagged fields of an existing target from the declared
    /// sources. The body is not read.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] raised by the field walk. Fields
    /// visited before the failure keep their new values.
    pub fn populate<T>(&self, target: &mut T, request: &dyn BindRequest) -> Result<(), BindError>
    where
        T: Bindable + ?Sized,
    {
        let mut visitor = SourceVisitor {
            resolver: &self.resolver,
            request,
            policy: self.policy,
            depth: 0,
        };
        target.visit_fields(&mut visitor)
    }
}

/// Binds a request into a new `T`, trying `sources` in order.
///
/// Shorthand for `Binder::new(sources).bind(request)`.
///
/// # Errors
///
/// See [`Binder::bind`].
///
/// # Example
///
/// ```rust
/// use tessera_bind::{bind, Bind, BindContext, BindError, SourceKind};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Deserialize, Serialize, Bind)]
/// struct Paging {
///     #[bind(param = "limit")]
///     limit: i32,
/// }
///
/// let ctx = BindContext::builder().build();
/// let err = bind::<Paging>(&ctx, &[SourceKind::Query]).unwrap_err();
/// assert_eq!(err, BindError::missing("limit"));
/// ```
pub fn bind<T>(request: &dyn BindRequest, sources: &[SourceKind]) -> Result<T, BindError>
where
    T: Bindable + Serialize + DeserializeOwned + Default,
{
    Binder::new(sources).bind(request)
}

/// Field visitor that resolves each tagged leaf from the request.
struct SourceVisitor<'b, 'r> {
    resolver: &'b SourceResolver,
    request: &'r dyn BindRequest,
    policy: MissingValuePolicy,
    depth: usize,
}

impl FieldVisitor for SourceVisitor<'_, '_> {
    fn leaf(&mut self, slot: FieldSlot<'_>) -> Result<(), BindError> {
        let Some(found) = self.resolver.resolve(slot.param, self.request) else {
            return match self.policy {
                MissingValuePolicy::Strict => Err(BindError::missing(slot.param)),
                MissingValuePolicy::Lenient => {
                    tracing::debug!(
                        param = slot.param,
                        field = slot.name,
                        "no source supplied parameter, keeping current value"
                    );
                    Ok(())
                }
            };
        };

        match slot.target {
            LeafTarget::Assignable(leaf) => leaf.assign(&found.value).map_err(|err| {
                BindError::coercion(slot.param, found.value.as_ref(), err.expected.name())
            })?,
            LeafTarget::ReadOnly(type_name) => {
                return Err(BindError::unassignable(slot.param, type_name))
            }
            LeafTarget::Unsupported(type_name) => {
                return Err(BindError::unsupported(slot.param, type_name))
            }
        }

        tracing::trace!(
            param = slot.param,
            field = slot.name,
            source = %found.kind,
            depth = self.depth,
            "bound field"
        );
        Ok(())
    }

    fn nested(&mut self, name: &'static str, target: &mut dyn Bindable) -> Result<(), BindError> {
        self.depth += 1;
        tracing::trace!(field = name, depth = self.depth, "entering nested structure");
        let result = target.visit_fields(self);
        self.depth -= 1;
        result
    }
}
