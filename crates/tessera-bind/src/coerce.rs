//! Text-to-field coercion.
//!
//! Values found in headers, query strings and path variables are text. A
//! tagged field converts that text into its own type through [`BindLeaf`].
//! Parsing is permissive in the way hand-typed request text needs: surrounding
//! whitespace is ignored, integers accept radix prefixes and a zero-only
//! decimal tail, and booleans accept the usual spellings.

use std::any::type_name;
use std::cell::Cell;
use std::fmt;

/// The primitive kind a leaf field coerces into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `String`
    Str,
}

impl LeafKind {
    /// Type name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text could not be converted into the expected kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}")]
pub struct CoerceError {
    /// The kind the text was supposed to be.
    pub expected: LeafKind,
}

/// A field type that can be assigned from request text.
///
/// Implemented for the signed integers `i16`, `i32`, `i64` and `isize`, for
/// `f32`, `f64`, `bool` and `String`, and for `Option` of any of them.
pub trait BindLeaf {
    /// The primitive kind this field coerces into.
    fn kind(&self) -> LeafKind;

    /// Parses `raw` and stores the result.
    ///
    /// On error the field keeps its previous value.
    fn assign(&mut self, raw: &str) -> Result<(), CoerceError>;
}

macro_rules! impl_integer_leaf {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl BindLeaf for $ty {
                fn kind(&self) -> LeafKind {
                    LeafKind::$kind
                }

                fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
                    *self = parse_integer(raw).ok_or(CoerceError { expected: LeafKind::$kind })?;
                    Ok(())
                }
            }
        )*
    };
}

impl_integer_leaf!(i16 => I16, i32 => I32, i64 => I64, isize => Isize);

impl BindLeaf for f32 {
    fn kind(&self) -> LeafKind {
        LeafKind::F32
    }

    fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
        *self = raw.trim().parse().map_err(|_| CoerceError {
            expected: LeafKind::F32,
        })?;
        Ok(())
    }
}

impl BindLeaf for f64 {
    fn kind(&self) -> LeafKind {
        LeafKind::F64
    }

    fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
        *self = raw.trim().parse().map_err(|_| CoerceError {
            expected: LeafKind::F64,
        })?;
        Ok(())
    }
}

impl BindLeaf for bool {
    fn kind(&self) -> LeafKind {
        LeafKind::Bool
    }

    fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
        *self = parse_bool(raw).ok_or(CoerceError {
            expected: LeafKind::Bool,
        })?;
        Ok(())
    }
}

impl BindLeaf for String {
    fn kind(&self) -> LeafKind {
        LeafKind::Str
    }

    fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl<T: BindLeaf + Default> BindLeaf for Option<T> {
    fn kind(&self) -> LeafKind {
        match self {
            Some(inner) => inner.kind(),
            None => T::default().kind(),
        }
    }

    fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
        let mut inner = T::default();
        inner.assign(raw)?;
        *self = Some(inner);
        Ok(())
    }
}

/// Parses a signed integer from request text.
///
/// Accepts surrounding whitespace, an optional sign, `0x`/`0o`/`0b` radix
/// prefixes and a decimal tail made only of zeros (`"42.0"`). Returns `None`
/// for anything else or for values outside `T`'s range.
///
/// ```rust
/// use tessera_bind::coerce::parse_integer;
///
/// assert_eq!(parse_integer::<i32>(" 42 "), Some(42));
/// assert_eq!(parse_integer::<i32>("-0x1f"), Some(-31));
/// assert_eq!(parse_integer::<i64>("30.00"), Some(30));
/// assert_eq!(parse_integer::<i16>("70000"), None);
/// assert_eq!(parse_integer::<i32>("4.5"), None);
/// ```
#[must_use]
pub fn parse_integer<T: TryFrom<i128>>(raw: &str) -> Option<T> {
    let text = raw.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match split_radix(unsigned) {
        (10, decimal) => (10, trim_zero_decimal(decimal)?),
        prefixed => prefixed,
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i128::from(u64::from_str_radix(digits, radix).ok()?);
    let value = if negative { -magnitude } else { magnitude };
    T::try_from(value).ok()
}

/// Parses a boolean from request text.
///
/// ```rust
/// use tessera_bind::coerce::parse_bool;
///
/// assert_eq!(parse_bool("true"), Some(true));
/// assert_eq!(parse_bool(" 0 "), Some(false));
/// assert_eq!(parse_bool("yes"), None);
/// ```
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

// "42.000" -> "42"; "42." and ".0" are rejected.
fn trim_zero_decimal(text: &str) -> Option<&str> {
    match text.split_once('.') {
        None => Some(text),
        Some((whole, fraction))
            if !whole.is_empty()
                && !fraction.is_empty()
                && fraction.bytes().all(|b| b == b'0') =>
        {
            Some(whole)
        }
        Some(_) => None,
    }
}

fn split_radix(text: &str) -> (u32, &str) {
    let lower = text.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &text[2..]),
        Some("0o") => (8, &text[2..]),
        Some("0b") => (2, &text[2..]),
        _ => (10, text),
    }
}

/// How a tagged field can be written, as seen by the field walker.
pub enum LeafTarget<'a> {
    /// The field can be assigned from text.
    Assignable(&'a mut (dyn BindLeaf + 'a)),
    /// The field is a shared reference and cannot be written.
    ReadOnly(&'static str),
    /// The field's type has no coercion rule.
    Unsupported(&'static str),
}

impl fmt::Debug for LeafTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignable(leaf) => f.debug_tuple("Assignable").field(&leaf.kind()).finish(),
            Self::ReadOnly(ty) => f.debug_tuple("ReadOnly").field(ty).finish(),
            Self::Unsupported(ty) => f.debug_tuple("Unsupported").field(ty).finish(),
        }
    }
}

/// Classifies a field for `#[derive(Bind)]`.
///
/// Generated code calls `(&&&Probe::new(&mut field)).leaf_target()` with the
/// three `*Leaf` traits in scope. Method resolution picks the most specific
/// impl that applies: [`AssignableLeaf`] for [`BindLeaf`] types,
/// [`SharedLeaf`] for `&T`, and [`UnsupportedLeaf`] for everything else.
#[doc(hidden)]
pub struct Probe<'a, T>(Cell<Option<&'a mut T>>);

impl<'a, T> Probe<'a, T> {
    #[doc(hidden)]
    pub fn new(field: &'a mut T) -> Self {
        Self(Cell::new(Some(field)))
    }

    pub(crate) fn take(&self) -> Option<&'a mut T> {
        self.0.take()
    }
}

#[doc(hidden)]
pub trait AssignableLeaf<'a> {
    fn leaf_target(&self) -> LeafTarget<'a>;
}

impl<'a, T: BindLeaf + 'a> AssignableLeaf<'a> for &&Probe<'a, T> {
    fn leaf_target(&self) -> LeafTarget<'a> {
        match self.0.take() {
            Some(field) => LeafTarget::Assignable(field),
            None => LeafTarget::Unsupported(type_name::<T>()),
        }
    }
}

#[doc(hidden)]
pub trait SharedLeaf<'a> {
    fn leaf_target(&self) -> LeafTarget<'a>;
}

impl<'a, 'r, U: ?Sized> SharedLeaf<'a> for &Probe<'a, &'r U> {
    fn leaf_target(&self) -> LeafTarget<'a> {
        LeafTarget::ReadOnly(type_name::<&U>())
    }
}

#[doc(hidden)]
pub trait UnsupportedLeaf<'a> {
    fn leaf_target(&self) -> LeafTarget<'a>;
}

impl<'a, T> UnsupportedLeaf<'a> for Probe<'a, T> {
    fn leaf_target(&self) -> LeafTarget<'a> {
        LeafTarget::Unsupported(type_name::<T>())
    }
}
