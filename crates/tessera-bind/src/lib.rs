//! # Tessera Bind
//!
//! Declarative request binding: fill a target structure from the JSON body
//! and from tagged fields drawn from headers, the query string or router path
//! variables.
//!
//! A binding runs in two phases:
//!
//! 1. The body is decoded into the target with `serde_json`. Fields the body
//!    leaves out keep the target's `Default` value.
//! 2. Every field tagged with `#[bind(param = "...")]` is overwritten with
//!    the first non-empty value found in the declared sources, converted to
//!    the field's type. Fields whose type is itself [`Bindable`] are walked
//!    recursively, tagged or not.
//!
//! The order of the declared sources is their precedence. Binding is
//! fail-fast: the first error aborts it and no target is returned.
//!
//! ## Sources
//!
//! | Kind | Token | Lookup |
//! |------|-------|--------|
//! | [`SourceKind::Headers`] | `headers` | Header value, name matched case-insensitively |
//! | [`SourceKind::Query`] | `query` | First query parameter, percent-decoded |
//! | [`SourceKind::PathVariables`] | `path-variables` | Variable captured by the router |
//!
//! ## Example
//!
//! ```rust
//! use tessera_bind::{bind, Bind, BindContext, SourceKind};
//! use serde::{Deserialize, Serialize};
//! use http::Uri;
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Bind)]
//! struct Profile {
//!     #[bind(param = "age")]
//!     age: i32,
//! }
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Bind)]
//! struct UpdateUser {
//!     #[bind(param = "user_id")]
//!     user_id: String,
//!     profile: Profile,
//! }
//!
//! let ctx = BindContext::builder()
//!     .uri(Uri::from_static("/users?user_id=abc"))
//!     .path_var("age", "30")
//!     .build();
//!
//! let user: UpdateUser = bind(&ctx, &[SourceKind::Query, SourceKind::PathVariables]).unwrap();
//! assert_eq!(user.user_id, "abc");
//! assert_eq!(user.profile.age, 30);
//! ```
//!
//! ## Supported field types
//!
//! `i16`, `i32`, `i64`, `isize`, `f32`, `f64`, `bool`, `String`, and `Option`
//! of any of them. A tagged field of another type fails the binding with
//! [`BindError::UnsupportedType`]; a tagged `&T` field fails it with
//! [`BindError::UnassignableField`].
//!
//! ## Errors
//!
//! Every failure is a [`BindError`] naming the parameter involved. It maps to
//! a `400 Bad Request` and to the client envelope built by
//! [`response::error_response`].

#![doc(html_root_url = "https://docs.rs/tessera-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as tessera_bind;

mod binder;
pub mod body;
pub mod coerce;
mod config;
mod context;
mod error;
pub mod response;
mod source;
mod walk;

pub use binder::{bind, Binder};
pub use coerce::{BindLeaf, CoerceError, LeafKind, LeafTarget};
pub use config::{BindConfig, BindConfigLoader, ConfigError, MissingValuePolicy};
pub use context::{BindContext, BindContextBuilder, BindRequest};
pub use error::{BindError, BindErrorKind, WEB_INPUT_ERROR, WEB_INPUT_MESSAGE};
pub use source::{
    extract_header, extract_path_variable, extract_query, ExtractFn, Resolved, SourceKind,
    SourceResolver, UnknownSourceKind,
};
pub use walk::{Bindable, FieldSlot, FieldVisitor};

/// Derives [`Bindable`] for a struct.
///
/// Field attributes:
///
/// - `#[bind(param = "name")]` binds the field from parameter `name`.
/// - `#[bind(nested)]` walks into the field, which must itself be `Bindable`.
///
/// Fields whose type is `Bindable` are walked with or without an attribute.
/// Other fields without an attribute are left to the body decoder.
pub use tessera_macros::Bind;

// Re-export useful types from dependencies
pub use tessera_core::{ApiError, PathVars};

/// Items used by `#[derive(Bind)]` output. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::coerce::{AssignableLeaf, Probe, SharedLeaf, UnsupportedLeaf};
    pub use crate::walk::{NestedField, PlainField};
}
