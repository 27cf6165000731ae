//! Return slots handed back to a fake.

use std::any::Any;

use crate::error::{Error, Result};
use crate::value::Value;

/// The return slots an expectation resolved a call to.
///
/// Fakes convert the slots back into their method's return type. The
/// panicking accessors report a misconfigured expectation as a test
/// failure; the `try_` variants return the error instead.
///
/// # Example
///
/// ```rust
/// use service_mock::controller::Returns;
/// use service_mock::value::Value;
///
/// let returns = Returns::new(vec![Value::new(7_i64), Value::nil()]);
/// let result: Result<i64, String> = returns.result();
/// assert_eq!(result, Ok(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Returns(Vec<Value>);

impl Returns {
    /// Wrap return slots.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow slot `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// The raw slots.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    fn slot(&self, index: usize) -> Result<&Value> {
        self.0.get(index).ok_or(Error::SlotOutOfRange {
            index,
            len: self.0.len(),
        })
    }

    /// Slot `index` as `T`, `nil` mapping to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is missing or holds another type.
    pub fn try_value<T: Any + Clone + Default>(&self, index: usize) -> Result<T> {
        self.slot(index)?.cast()
    }

    /// Slot `index` as `Option<T>`, `nil` mapping to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is missing or holds another type.
    pub fn try_option<T: Any + Clone>(&self, index: usize) -> Result<Option<T>> {
        self.slot(index)?.cast_option()
    }

    /// Slot `index` read as an error slot: `nil` is success.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is missing or holds another type.
    pub fn try_error<E: Any + Clone>(&self, index: usize) -> Result<std::result::Result<(), E>> {
        Ok(match self.try_option::<E>(index)? {
            Some(err) => Err(err),
            None => Ok(()),
        })
    }

    /// Slot `index` as `T`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is missing or holds another type.
    #[must_use]
    pub fn value<T: Any + Clone + Default>(&self, index: usize) -> T {
        self.try_value(index).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Slot `index` as `Option<T>`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is missing or holds another type.
    #[must_use]
    pub fn option<T: Any + Clone>(&self, index: usize) -> Option<T> {
        self.try_option(index).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Slot `index` as an error slot.
    ///
    /// # Errors
    ///
    /// Returns the error stored in the slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is missing or holds another type.
    pub fn error<E: Any + Clone>(&self, index: usize) -> std::result::Result<(), E> {
        self.try_error(index).unwrap_or_else(|err| panic!("{err}"))
    }

    /// The usual `(value, error)` pair as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the error in the last slot, if any.
    ///
    /// # Panics
    ///
    /// Panics if there are not exactly two slots of the right types.
    pub fn result<T, E>(&self) -> std::result::Result<T, E>
    where
        T: Any + Clone + Default,
        E: Any + Clone,
    {
        self.expect_len(2);
        self.error::<E>(1)?;
        Ok(self.value(0))
    }

    /// Like [`result`](Self::result) for an optional success payload.
    ///
    /// # Errors
    ///
    /// Returns the error in the last slot, if any.
    ///
    /// # Panics
    ///
    /// Panics if there are not exactly two slots of the right types.
    pub fn option_result<T, E>(&self) -> std::result::Result<Option<T>, E>
    where
        T: Any + Clone,
        E: Any + Clone,
    {
        self.expect_len(2);
        self.error::<E>(1)?;
        Ok(self.option(0))
    }

    /// A single error slot as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the error in the slot, if any.
    ///
    /// # Panics
    ///
    /// Panics if there is not exactly one slot of the right type.
    pub fn unit_result<E: Any + Clone>(&self) -> std::result::Result<(), E> {
        self.expect_len(1);
        self.error(0)
    }

    fn expect_len(&self, want: usize) {
        assert!(
            self.0.len() == want,
            "expected {want} return value(s), got {}",
            self.0.len()
        );
    }
}
