//! Procedural macros for Tessera request binding.
//!
//! This crate provides `#[derive(Bind)]`, which implements
//! `tessera_bind::Bindable` for a struct. Use it through the re-export in
//! `tessera-bind`; the generated code refers to that crate by name.
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_bind::Bind;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Deserialize, Serialize, Bind)]
//! struct GetOrder {
//!     #[bind(param = "order_id")]
//!     order_id: i64,
//!     #[bind(nested)]
//!     paging: Paging,
//!     note: String,
//! }
//! ```
//!
//! # Macro Expansion
//!
//! The derive:
//!
//! 1. Reads the `#[bind(...)]` attribute of every field
//! 2. Walks every field whose type implements `Bindable`, tagged or not
//! 3. Emits one `FieldVisitor::leaf` call per remaining `param` field
//! 4. Leaves untagged leaf fields to the body decoder

mod expand;
mod parse;

use proc_macro::TokenStream;

/// Derives `tessera_bind::Bindable`.
///
/// # Attributes
///
/// - `#[bind(param = "name")]`: fill the field from request parameter `name`
/// - `#[bind(nested)]`: walk into the field, which must implement `Bindable`
///
/// A field takes at most one of the two. Fields whose type implements
/// `Bindable` are walked even without `#[bind(nested)]`; the attribute only
/// turns a missing impl into a compile error. Deriving for an enum or a union
/// is a compile error.
///
/// # Generated Code
///
/// For the `GetOrder` struct from the crate documentation, the macro
/// generates approximately:
///
/// ```rust,ignore
/// impl tessera_bind::Bindable for GetOrder {
///     fn visit_fields(
///         &mut self,
///         visitor: &mut dyn tessera_bind::FieldVisitor,
///     ) -> Result<(), tessera_bind::BindError> {
///         visitor.leaf(FieldSlot::new("order_id", "order_id", classify(&mut self.order_id)))?;
///         visitor.nested("paging", &mut self.paging)?;
///         walk_if_bindable("note", &mut self.note, visitor)?;
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    expand::expand_derive_bind(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
