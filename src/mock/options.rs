//! The declarative description of one expected call.

use std::fmt;
use std::sync::Arc;

use crate::controller::{Action, CallRef};
use crate::matcher::{ArgMatcher, IntoArg};
use crate::value::{IntoValue, Value};

/// Arguments after the context.
#[derive(Debug, Clone, Default)]
pub enum Input {
    /// Every parameter after the context matches anything.
    #[default]
    None,
    /// Bound to the second parameter.
    One(ArgMatcher),
    /// Bound positionally from the second parameter on, spilling into the
    /// variadic tail.
    List(Vec<ArgMatcher>),
}

impl Input {
    /// No explicit arguments.
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// A single argument.
    ///
    /// Optional parameters are recorded unwrapped; see [`arg`](crate::matcher::arg).
    pub fn one(value: impl IntoArg) -> Self {
        Self::One(value.into_arg())
    }

    /// An ordered argument list. Use [`args!`](crate::args) for mixed types.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        Self::List(values.into_iter().map(IntoArg::into_arg).collect())
    }
}

/// Non-error return slots.
#[derive(Debug, Clone, Default)]
pub enum Output {
    /// One `nil` slot.
    #[default]
    None,
    /// One slot.
    One(Value),
    /// One slot per element.
    List(Vec<Value>),
}

impl Output {
    /// A single return value.
    pub fn one(value: impl IntoValue) -> Self {
        Self::One(value.into_value())
    }

    /// Several return values.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoValue,
    {
        Self::List(values.into_iter().map(IntoValue::into_value).collect())
    }

    pub(crate) fn into_slots(self) -> Vec<Value> {
        match self {
            Self::None => vec![Value::nil()],
            Self::One(value) => vec![value],
            Self::List(values) => values,
        }
    }
}

/// Everything a mocked call may declare.
///
/// Either fill the fields directly:
///
/// ```rust,ignore
/// mock.mock(MockOptions {
///     call: Some(mock.recorder().get_by_string()),
///     input: Input::one("Hello World"),
///     returns: Output::one("Mocked Output"),
///     times: 1,
///     ..Default::default()
/// });
/// ```
///
/// or chain the builder methods:
///
/// ```rust,ignore
/// mock.mock(
///     MockOptions::new(mock.recorder().get_by_string())
///         .input("Hello World")
///         .returns("Mocked Output")
///         .times(1),
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockOptions {
    /// Matcher for the first (context) parameter; anything if unset.
    pub ctx: Option<ArgMatcher>,

    /// The recorder method being mocked. Required.
    pub call: Option<CallRef>,

    /// Arguments after the context.
    pub input: Input,

    /// Successful return values.
    pub returns: Output,

    /// Error for the last return slot; success if unset.
    pub error: Option<Value>,

    /// The method's only return slot is the error.
    pub single_error_returned: bool,

    /// Computes the return values at call time; wins over `returns` and
    /// `error`.
    pub do_and_return: Option<Action>,

    /// Exact number of calls; zero means the method must not be called.
    pub times: usize,

    /// Allow any number of calls, none included; overrides `times`.
    pub any_times: bool,
}

impl MockOptions {
    /// Options for the given recorder method.
    #[must_use]
    pub fn new(call: CallRef) -> Self {
        Self {
            call: Some(call),
            ..Self::default()
        }
    }

    /// Match the context parameter.
    #[must_use]
    pub fn ctx(mut self, ctx: impl IntoArg) -> Self {
        self.ctx = Some(ctx.into_arg());
        self
    }

    /// Bind a single argument after the context.
    #[must_use]
    pub fn input(mut self, value: impl IntoArg) -> Self {
        self.input = Input::one(value);
        self
    }

    /// Bind an argument list after the context.
    #[must_use]
    pub fn inputs(mut self, input: Input) -> Self {
        self.input = input;
        self
    }

    /// Return a single value.
    #[must_use]
    pub fn returns(mut self, value: impl IntoValue) -> Self {
        self.returns = Output::one(value);
        self
    }

    /// Return several values before the error slot.
    #[must_use]
    pub fn returns_list(mut self, output: Output) -> Self {
        self.returns = output;
        self
    }

    /// Return an error in the last slot.
    #[must_use]
    pub fn error(mut self, error: impl IntoValue) -> Self {
        self.error = Some(error.into_value());
        self
    }

    /// The method returns only an error.
    #[must_use]
    pub fn single_error(mut self) -> Self {
        self.single_error_returned = true;
        self
    }

    /// Compute the return values at call time.
    #[must_use]
    pub fn do_and_return<F>(mut self, action: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.do_and_return = Some(Arc::new(action));
        self
    }

    /// Expect exactly `n` calls.
    #[must_use]
    pub fn times(mut self, n: usize) -> Self {
        self.times = n;
        self
    }

    /// Allow any number of calls.
    #[must_use]
    pub fn any_times(mut self) -> Self {
        self.any_times = true;
        self
    }
}

impl fmt::Debug for MockOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockOptions")
            .field("ctx", &self.ctx)
            .field("call", &self.call.as_ref().map(|c| c.signature().name()))
            .field("input", &self.input)
            .field("returns", &self.returns)
            .field("error", &self.error)
            .field("single_error_returned", &self.single_error_returned)
            .field("do_and_return", &self.do_and_return.is_some())
            .field("times", &self.times)
            .field("any_times", &self.any_times)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{any, Matcher};

    #[test]
    fn test_defaults() {
        let opts = MockOptions::default();
        assert!(opts.call.is_none());
        assert!(opts.ctx.is_none());
        assert!(matches!(opts.input, Input::None));
        assert!(matches!(opts.returns, Output::None));
        assert_eq!(opts.times, 0);
        assert!(!opts.any_times);
        assert!(!opts.single_error_returned);
    }

    #[test]
    fn test_builder_methods() {
        let opts = MockOptions::default()
            .ctx(any())
            .input("Hello World")
            .returns("Mocked Output")
            .error("boom")
            .single_error()
            .times(2)
            .any_times();

        assert!(opts.ctx.is_some());
        assert!(matches!(opts.input, Input::One(ref m) if m.matches(&Value::new("Hello World"))));
        assert!(matches!(
            opts.returns,
            Output::One(ref v) if v.equals(&Value::new("Mocked Output"))
        ));
        assert!(opts.error.is_some());
        assert!(opts.single_error_returned);
        assert_eq!(opts.times, 2);
        assert!(opts.any_times);
    }

    #[test]
    fn test_input_list() {
        let input = Input::list(["a", "b"]);
        let Input::List(matchers) = input else {
            panic!("expected a list input");
        };
        assert_eq!(matchers.len(), 2);
        assert!(matchers[1].matches(&Value::new("b")));
    }

    #[test]
    fn test_output_slots() {
        assert!(Output::None.into_slots()[0].is_nil());
        assert_eq!(Output::one(1_i64).into_slots().len(), 1);
        assert_eq!(Output::list([1_i64, 2, 3]).into_slots().len(), 3);
        assert!(Output::list(Vec::<i64>::new()).into_slots().is_empty());
    }

    #[test]
    fn test_debug_hides_action() {
        let opts = MockOptions::default().do_and_return(|_| Vec::new());
        let debug = format!("{opts:?}");
        assert!(debug.contains("MockOptions"));
        assert!(debug.contains("do_and_return: true"));
    }
}
