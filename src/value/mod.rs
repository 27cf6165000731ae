//! Type-erased argument and return values.
//!
//! Fakes record every call argument as a [`Value`] and expectations hand
//! return slots back as [`Value`]s. Values compare by value, so two separately
//! built structs that are equal match each other.
//!
//! # Example
//!
//! ```rust
//! use service_mock::value::Value;
//!
//! let a = Value::new("Hello World");
//! let b = Value::new(String::from("Hello World"));
//! assert!(a.equals(&b));
//!
//! assert!(Value::nil().is_nil());
//! assert_eq!(Value::nil().cast::<i64>().unwrap(), 0);
//! ```

use std::any::{type_name, Any};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Object-safe view of a comparable value.
trait DynValue: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn eq_dyn(&self, other: &dyn DynValue) -> bool;

    fn type_name(&self) -> &'static str;
}

impl<T> DynValue for T
where
    T: Any + PartialEq + Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn DynValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

#[derive(Clone)]
enum Repr {
    Nil,
    Scalar(Arc<dyn DynValue>),
    List(Vec<Value>),
}

/// A call argument or return slot.
///
/// A value is `nil`, one comparable value of any `'static` type, or a list
/// of values (the variadic tail of a call).
#[derive(Clone)]
pub struct Value(Repr);

impl Value {
    /// Wrap a value.
    ///
    /// `&'static str` is stored as `String` so string literals compare
    /// equal to the owned strings fakes record.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + PartialEq + Debug + Send + Sync,
    {
        let any: &dyn Any = &value;
        if let Some(s) = any.downcast_ref::<&'static str>() {
            return Self(Repr::Scalar(Arc::new((*s).to_owned())));
        }
        Self(Repr::Scalar(Arc::new(value)))
    }

    /// The absent value.
    #[must_use]
    pub fn nil() -> Self {
        Self(Repr::Nil)
    }

    /// A list of values.
    #[must_use]
    pub fn list(values: Vec<Value>) -> Self {
        Self(Repr::List(values))
    }

    /// `None` becomes `nil`, `Some(v)` becomes `v`.
    pub fn from_option<T>(value: Option<T>) -> Self
    where
        T: Any + PartialEq + Debug + Send + Sync,
    {
        value.map_or_else(Self::nil, Self::new)
    }

    /// Check if this is the absent value.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self.0, Repr::Nil)
    }

    /// The elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match &self.0 {
            Repr::List(values) => Some(values),
            _ => None,
        }
    }

    /// Borrow the wrapped value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.0 {
            Repr::Scalar(inner) => inner.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Name of the stored type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match &self.0 {
            Repr::Nil => "nil",
            Repr::Scalar(inner) => inner.type_name(),
            Repr::List(_) => "list",
        }
    }

    /// Compare by value.
    ///
    /// Values of different types are never equal; `nil` only equals `nil`.
    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        match (&self.0, &other.0) {
            (Repr::Nil, Repr::Nil) => true,
            (Repr::Scalar(a), Repr::Scalar(b)) => a.eq_dyn(b.as_ref()),
            (Repr::List(a), Repr::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.equals(b))
            }
            _ => false,
        }
    }

    /// Clone the wrapped value out as `T`, with `nil` mapping to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueType`] if a non-nil value of another type is stored.
    pub fn cast<T: Any + Clone + Default>(&self) -> Result<T> {
        if self.is_nil() {
            return Ok(T::default());
        }
        self.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| self.type_error::<T>())
    }

    /// Clone the wrapped value out as `Option<T>`, with `nil` mapping to `None`.
    ///
    /// Both a stored `T` and a stored `Option<T>` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueType`] if a value of another type is stored.
    pub fn cast_option<T: Any + Clone>(&self) -> Result<Option<T>> {
        if self.is_nil() {
            return Ok(None);
        }
        if let Some(value) = self.downcast_ref::<T>() {
            return Ok(Some(value.clone()));
        }
        self.downcast_ref::<Option<T>>()
            .cloned()
            .ok_or_else(|| self.type_error::<T>())
    }

    fn type_error<T>(&self) -> Error {
        Error::ValueType {
            expected: type_name::<T>(),
            found: self.type_name(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::nil()
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Nil => f.write_str("nil"),
            Repr::Scalar(inner) => Debug::fmt(inner, f),
            Repr::List(values) => f.debug_list().entries(values).finish(),
        }
    }
}

/// Conversion into a [`Value`].
///
/// Implemented for every comparable `'static` type and for [`Value`] itself.
pub trait IntoValue {
    /// Convert into a value.
    fn into_value(self) -> Value;
}

impl<T> IntoValue for T
where
    T: Any + PartialEq + Debug + Send + Sync,
{
    fn into_value(self) -> Value {
        Value::new(self)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

/// Render values as a comma separated argument list.
pub(crate) fn render(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
