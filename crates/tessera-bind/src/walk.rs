//! Structural walk over bindable targets.
//!
//! A [`Bindable`] type reports its fields to a [`FieldVisitor`] in declaration
//! order: tagged leaves through [`FieldVisitor::leaf`], nested structures
//! through [`FieldVisitor::nested`]. Nested structures are reported whether or
//! not they carry a tag; untagged leaves are never reported.
//! `#[derive(Bind)]` writes the implementation; hand-written ones must keep
//! the same order and may only report each field once.

use crate::coerce::{LeafTarget, Probe};
use crate::BindError;

/// A structure whose tagged fields can be filled from request sources.
///
/// # Implementing by hand
///
/// ```rust
/// use tessera_bind::{BindError, Bindable, FieldSlot, FieldVisitor, LeafTarget};
///
/// struct Paging {
///     limit: i32,
/// }
///
/// impl Bindable for Paging {
///     fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), BindError> {
///         visitor.leaf(FieldSlot::new("limit", "limit", LeafTarget::Assignable(&mut self.limit)))
///     }
/// }
/// ```
pub trait Bindable {
    /// Reports every tagged leaf and nested structure to `visitor`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the visitor.
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), BindError>;
}

impl<T: Bindable + ?Sized> Bindable for Box<T> {
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), BindError> {
        (**self).visit_fields(visitor)
    }
}

/// Receives the fields of a [`Bindable`] target.
pub trait FieldVisitor {
    /// Called for a leaf field carrying a binding tag.
    fn leaf(&mut self, slot: FieldSlot<'_>) -> Result<(), BindError>;

    /// Called for a nested structure field, tagged or not.
    ///
    /// Implementations recurse by calling `target.visit_fields(self)`.
    fn nested(&mut self, name: &'static str, target: &mut dyn Bindable) -> Result<(), BindError>;
}

/// A tagged leaf field handed to a [`FieldVisitor`].
#[derive(Debug)]
pub struct FieldSlot<'a> {
    /// Field name as declared.
    pub name: &'static str,
    /// Parameter name from the binding tag.
    pub param: &'static str,
    /// Write access to the field.
    pub target: LeafTarget<'a>,
}

impl<'a> FieldSlot<'a> {
    /// Creates a slot.
    #[must_use]
    pub fn new(name: &'static str, param: &'static str, target: LeafTarget<'a>) -> Self {
        Self {
            name,
            param,
            target,
        }
    }
}

/// Walks into a field for `#[derive(Bind)]` if its type is [`Bindable`].
///
/// Generated code calls `(&&Probe::new(&mut field)).walk_nested(name, visitor)`
/// with both traits in scope. [`NestedField`] applies to `Bindable` types and
/// reports the field through [`FieldVisitor::nested`]; [`PlainField`] applies
/// to everything else and does nothing. The result tells whether the field was
/// walked.
#[doc(hidden)]
pub trait NestedField {
    fn walk_nested(
        &self,
        name: &'static str,
        visitor: &mut dyn FieldVisitor,
    ) -> Result<bool, BindError>;
}

impl<T: Bindable> NestedField for &Probe<'_, T> {
    fn walk_nested(
        &self,
        name: &'static str,
        visitor: &mut dyn FieldVisitor,
    ) -> Result<bool, BindError> {
        match self.take() {
            Some(field) => visitor.nested(name, field).map(|()| true),
            None => Ok(false),
        }
    }
}

#[doc(hidden)]
pub trait PlainField {
    fn walk_nested(
        &self,
        name: &'static str,
        visitor: &mut dyn FieldVisitor,
    ) -> Result<bool, BindError>;
}

impl<T> PlainField for Probe<'_, T> {
    fn walk_nested(&self, _: &'static str, _: &mut dyn FieldVisitor) -> Result<bool, BindError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        age: i32,
    }

    impl Bindable for Inner {
        fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), BindError> {
            visitor.leaf(FieldSlot::new("age", "age", LeafTarget::Assignable(&mut self.age)))
        }
    }

    struct Outer {
        id: String,
        inner: Box<Inner>,
    }

    impl Bindable for Outer {
        fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) -> Result<(), BindError> {
            visitor.leaf(FieldSlot::new("id", "user_id", LeafTarget::Assignable(&mut self.id)))?;
            visitor.nested("inner", &mut self.inner)
        }
    }

    /// Records the visit order and writes the parameter name into every leaf.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl FieldVisitor for Recorder {
        fn leaf(&mut self, slot: FieldSlot<'_>) -> Result<(), BindError> {
            self.seen.push(format!("leaf:{}", slot.param));
            if let LeafTarget::Assignable(leaf) = slot.target {
                let _ = leaf.assign("12");
            }
            Ok(())
        }

        fn nested(
            &mut self,
            name: &'static str,
            target: &mut dyn Bindable,
        ) -> Result<(), BindError> {
            self.seen.push(format!("nested:{name}"));
            target.visit_fields(self)
        }
    }

    #[test]
    fn test_visit_order_is_depth_first() {
        let mut outer = Outer {
            id: String::new(),
            inner: Box::new(Inner { age: 0 }),
        };
        let mut recorder = Recorder::default();

        outer.visit_fields(&mut recorder).unwrap();

        assert_eq!(
            recorder.seen,
            vec!["leaf:user_id", "nested:inner", "leaf:age"]
        );
        assert_eq!(outer.id, "12");
        assert_eq!(outer.inner.age, 12);
    }

    struct FailFirst;

    impl FieldVisitor for FailFirst {
        fn leaf(&mut self, slot: FieldSlot<'_>) -> Result<(), BindError> {
            Err(BindError::missing(slot.param))
        }

        fn nested(&mut self, _: &'static str, target: &mut dyn Bindable) -> Result<(), BindError> {
            target.visit_fields(self)
        }
    }

    #[test]
    fn test_probe_walks_bindable_fields_only() {
        let mut inner = Inner { age: 0 };
        let mut note = String::from("kept");
        let mut recorder = Recorder::default();

        let walked = (&&Probe::new(&mut inner))
            .walk_nested("inner", &mut recorder)
            .unwrap();
        let skipped = (&&Probe::new(&mut note))
            .walk_nested("note", &mut recorder)
            .unwrap();

        assert!(walked);
        assert!(!skipped);
        assert_eq!(recorder.seen, vec!["nested:inner", "leaf:age"]);
        assert_eq!(inner.age, 12);
        assert_eq!(note, "kept");
    }

    #[test]
    fn test_first_error_stops_the_walk() {
        let mut outer = Outer {
            id: String::new(),
            inner: Box::new(Inner { age: 0 }),
        };

        let err = outer.visit_fields(&mut FailFirst).unwrap_err();
        assert_eq!(err, BindError::missing("user_id"));
    }
}
