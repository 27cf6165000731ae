// Matcher factories return the matcher for later registration, so ignoring
// the result is the usual pattern in test setup.
#![allow(clippy::must_use_candidate)]

//! Argument matchers for expectations.
//!
//! Every argument slot of a registered expectation holds an [`ArgMatcher`]:
//!
//! - [`Matcher`] trait for custom matchers
//! - Built-in matchers: [`any`], [`eq`], [`nil`], [`satisfies`], [`len`]
//! - Combinators: [`all_of`], [`any_of`], [`not`]
//! - [`arg`] and [`args!`](crate::args) to turn plain values into matchers
//!
//! # Example
//!
//! ```rust
//! use service_mock::matcher::{any, eq, not, Matcher};
//! use service_mock::value::Value;
//!
//! assert!(any().matches(&Value::new(42_i64)));
//! assert!(eq("Hello").matches(&Value::new("Hello".to_string())));
//! assert!(not(eq(0_i64)).matches(&Value::new(1_i64)));
//! ```

use std::any::{type_name, Any};
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::value::{IntoValue, Value};

/// A matcher for testing values.
///
/// # Implementing Custom Matchers
///
/// ```rust
/// use service_mock::matcher::{ArgMatcher, Matcher};
/// use service_mock::value::Value;
///
/// struct IsEven;
///
/// impl Matcher<Value> for IsEven {
///     fn matches(&self, value: &Value) -> bool {
///         value.downcast_ref::<i64>().is_some_and(|v| v % 2 == 0)
///     }
///
///     fn describe(&self) -> String {
///         "is even".to_string()
///     }
///
///     fn describe_mismatch(&self, value: &Value) -> String {
///         format!("{:?} is not even", value)
///     }
/// }
///
/// let m = ArgMatcher::new(IsEven);
/// assert!(m.matches(&Value::new(4_i64)));
/// assert!(!m.matches(&Value::new(3_i64)));
/// ```
pub trait Matcher<T: ?Sized> {
    /// Check if the value matches.
    fn matches(&self, value: &T) -> bool;

    /// Describe what this matcher expects.
    fn describe(&self) -> String;

    /// Describe why a value didn't match.
    fn describe_mismatch(&self, value: &T) -> String;
}

/// A shared matcher for one argument slot.
#[derive(Clone)]
pub struct ArgMatcher(Arc<dyn Matcher<Value> + Send + Sync>);

impl ArgMatcher {
    /// Share a matcher.
    pub fn new<M>(matcher: M) -> Self
    where
        M: Matcher<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(matcher))
    }
}

impl Matcher<Value> for ArgMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.0.matches(value)
    }

    fn describe(&self) -> String {
        self.0.describe()
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        self.0.describe_mismatch(value)
    }
}

impl Debug for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Conversion into an [`ArgMatcher`].
///
/// Matchers pass through; any other value becomes an [`eq`] matcher.
pub trait IntoArg {
    /// Convert into a matcher.
    fn into_arg(self) -> ArgMatcher;
}

impl IntoArg for ArgMatcher {
    fn into_arg(self) -> ArgMatcher {
        self
    }
}

impl IntoArg for Value {
    fn into_arg(self) -> ArgMatcher {
        eq(self)
    }
}

impl<T> IntoArg for T
where
    T: Any + PartialEq + Debug + Send + Sync,
{
    fn into_arg(self) -> ArgMatcher {
        eq(self)
    }
}

/// Convert a value or a matcher into an [`ArgMatcher`].
///
/// An `Option<T>` is compared as an `Option<T>`. Fakes record optional
/// arguments with [`Value::from_option`], which stores the unwrapped `T` or
/// `nil`, so pass the unwrapped value, [`nil`], or
/// `Value::from_option(..)` to match them.
///
/// # Example
///
/// ```rust
/// use service_mock::matcher::{any, arg, Matcher};
/// use service_mock::value::Value;
///
/// assert!(arg("id").matches(&Value::new("id")));
/// assert!(arg(any()).matches(&Value::nil()));
///
/// let recorded = Value::from_option(Some(7_i64));
/// assert!(arg(7_i64).matches(&recorded));
/// assert!(arg(Value::from_option(Some(7_i64))).matches(&recorded));
/// assert!(!arg(Some(7_i64)).matches(&recorded));
/// ```
pub fn arg(value: impl IntoArg) -> ArgMatcher {
    value.into_arg()
}

/// Build an [`Input::List`](crate::mock::Input::List) from values and matchers.
///
/// # Example
///
/// ```rust
/// use service_mock::{args, matcher::any, mock::Input};
///
/// let input = args!["Hello World", any(), 3_i64];
/// assert!(matches!(input, Input::List(ref xs) if xs.len() == 3));
///
/// let empty = args![];
/// assert!(matches!(empty, Input::List(ref xs) if xs.is_empty()));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::mock::Input::List(::std::vec::Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::mock::Input::List(::std::vec![$($crate::matcher::arg($value)),+])
    };
}

// =============================================================================
// Built-in Matchers
// =============================================================================

/// Create a matcher that accepts any value, `nil` and lists included.
pub fn any() -> ArgMatcher {
    ArgMatcher::new(AnyMatcher)
}

/// Matcher that matches anything.
pub struct AnyMatcher;

impl Matcher<Value> for AnyMatcher {
    fn matches(&self, _value: &Value) -> bool {
        true
    }

    fn describe(&self) -> String {
        "is anything".to_string()
    }

    fn describe_mismatch(&self, _value: &Value) -> String {
        "matches anything".to_string()
    }
}

/// Create an equality matcher.
///
/// # Example
///
/// ```rust
/// use service_mock::matcher::{eq, Matcher};
/// use service_mock::value::Value;
///
/// let m = eq(42_i64);
/// assert!(m.matches(&Value::new(42_i64)));
/// assert!(!m.matches(&Value::new(0_i64)));
/// ```
pub fn eq(expected: impl IntoValue) -> ArgMatcher {
    ArgMatcher::new(EqMatcher {
        expected: expected.into_value(),
    })
}

/// Matcher for equality.
pub struct EqMatcher {
    expected: Value,
}

impl Matcher<Value> for EqMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.equals(&self.expected)
    }

    fn describe(&self) -> String {
        format!("is equal to {:?} ({})", self.expected, self.expected.type_name())
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!(
            "{:?} ({}) is not equal to {:?} ({})",
            value,
            value.type_name(),
            self.expected,
            self.expected.type_name()
        )
    }
}

/// Create a matcher that accepts only `nil`.
pub fn nil() -> ArgMatcher {
    ArgMatcher::new(NilMatcher)
}

/// Matcher for the absent value.
pub struct NilMatcher;

impl Matcher<Value> for NilMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.is_nil()
    }

    fn describe(&self) -> String {
        "is nil".to_string()
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!("{value:?} is not nil")
    }
}

/// Create a matcher for a list (variadic tail) of exactly `n` values.
///
/// # Example
///
/// ```rust
/// use service_mock::matcher::{len, Matcher};
/// use service_mock::value::Value;
///
/// let tail = Value::list(vec![Value::new("a"), Value::new("b")]);
/// assert!(len(2).matches(&tail));
/// assert!(!len(1).matches(&tail));
/// ```
pub fn len(n: usize) -> ArgMatcher {
    ArgMatcher::new(LenMatcher { len: n })
}

/// Matcher for list length.
pub struct LenMatcher {
    len: usize,
}

impl Matcher<Value> for LenMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.as_list().is_some_and(|xs| xs.len() == self.len)
    }

    fn describe(&self) -> String {
        format!("has length {}", self.len)
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        match value.as_list() {
            Some(xs) => format!("{value:?} has length {}, not {}", xs.len(), self.len),
            None => format!("{value:?} is not a list"),
        }
    }
}

/// Create a predicate-based matcher over values of type `T`.
///
/// Values of any other type never match.
///
/// # Example
///
/// ```rust
/// use service_mock::matcher::{satisfies, Matcher};
/// use service_mock::value::Value;
///
/// let m = satisfies(|x: &i64| *x % 2 == 0, "is even");
/// assert!(m.matches(&Value::new(4_i64)));
/// assert!(!m.matches(&Value::new(3_i64)));
/// assert!(!m.matches(&Value::new("4")));
/// ```
pub fn satisfies<T, F>(predicate: F, description: &str) -> ArgMatcher
where
    T: Any,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    ArgMatcher::new(PredicateMatcher {
        predicate,
        description: description.to_string(),
        _phantom: PhantomData,
    })
}

/// Matcher based on a predicate function.
pub struct PredicateMatcher<T, F> {
    predicate: F,
    description: String,
    _phantom: PhantomData<fn(&T)>,
}

impl<T: Any, F: Fn(&T) -> bool> Matcher<Value> for PredicateMatcher<T, F> {
    fn matches(&self, value: &Value) -> bool {
        value.downcast_ref::<T>().is_some_and(|v| (self.predicate)(v))
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        if value.downcast_ref::<T>().is_none() {
            return format!("{value:?} is not a {}", type_name::<T>());
        }
        format!("{value:?} does not satisfy: {}", self.description)
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Create a matcher that matches when all matchers match.
pub fn all_of(matchers: Vec<ArgMatcher>) -> ArgMatcher {
    ArgMatcher::new(AllOfMatcher { matchers })
}

/// Matcher that requires all inner matchers to match.
pub struct AllOfMatcher {
    matchers: Vec<ArgMatcher>,
}

impl Matcher<Value> for AllOfMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.matchers.iter().all(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let descriptions: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("all of [{}]", descriptions.join(", "))
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        let failures: Vec<_> = self
            .matchers
            .iter()
            .filter(|m| !m.matches(value))
            .map(|m| m.describe_mismatch(value))
            .collect();
        format!("failed: {}", failures.join("; "))
    }
}

/// Create a matcher that matches when any matcher matches.
///
/// # Example
///
/// ```rust
/// use service_mock::matcher::{any_of, eq, Matcher};
/// use service_mock::value::Value;
///
/// let m = any_of(vec![eq("a"), eq("b")]);
/// assert!(m.matches(&Value::new("b")));
/// assert!(!m.matches(&Value::new("c")));
/// ```
pub fn any_of(matchers: Vec<ArgMatcher>) -> ArgMatcher {
    ArgMatcher::new(AnyOfMatcher { matchers })
}

/// Matcher that requires at least one inner matcher to match.
pub struct AnyOfMatcher {
    matchers: Vec<ArgMatcher>,
}

impl Matcher<Value> for AnyOfMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.matchers.iter().any(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let descriptions: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("any of [{}]", descriptions.join(", "))
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        let descriptions: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("{value:?} matched none of [{}]", descriptions.join(", "))
    }
}

/// Create a negating matcher.
pub fn not(matcher: impl IntoArg) -> ArgMatcher {
    ArgMatcher::new(NotMatcher {
        inner: matcher.into_arg(),
    })
}

/// Matcher that negates another matcher.
pub struct NotMatcher {
    inner: ArgMatcher,
}

impl Matcher<Value> for NotMatcher {
    fn matches(&self, value: &Value) -> bool {
        !self.inner.matches(value)
    }

    fn describe(&self) -> String {
        format!("not {}", self.inner.describe())
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!("{value:?} unexpectedly matched: {}", self.inner.describe())
    }
}
