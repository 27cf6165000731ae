//! The runtime fakes are written against.
//!
//! A [`Controller`] owns the expectations registered for one test scope:
//!
//! - Fakes call [`Controller::register`] once and [`Controller::call`] from
//!   every method, passing the arguments as [`Value`]s.
//! - Recorders hand out a [`CallRef`] per method; recording one yields a
//!   [`Call`] to configure.
//! - Declared counts are verified by [`Controller::finish`], or when the
//!   last clone of the controller is dropped.
//!
//! # Example
//!
//! ```rust
//! use service_mock::controller::{Controller, MethodSignature};
//! use service_mock::matcher::{any, arg};
//! use service_mock::value::Value;
//!
//! const GET: MethodSignature = MethodSignature::new("Get", 2, 2);
//!
//! let controller = Controller::new();
//! let receiver = controller.register();
//!
//! controller
//!     .call_ref(receiver, GET)
//!     .record(vec![any(), arg("key")])
//!     .unwrap()
//!     .returns(vec![Value::new("value"), Value::nil()])
//!     .unwrap()
//!     .times(1);
//!
//! let returns = controller.call(receiver, &GET, vec![Value::new("ctx"), Value::new("key")]);
//! assert_eq!(returns.result::<String, String>(), Ok("value".to_string()));
//!
//! controller.finish().unwrap();
//! ```

mod call;
mod returns;
mod signature;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::matcher::ArgMatcher;
use crate::value::{self, Value};

use call::{ExpectedCall, Resolution};

pub use call::{Action, Call};
pub use returns::Returns;
pub use signature::{CallRef, MethodSignature};

/// Identity of one fake instance within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(pub(crate) u64);

impl ReceiverId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Receiver({})", self.0)
    }
}

/// Shared expectation registry for one test scope.
///
/// Clones share state. Fakes keep a clone, so the scope ends when the last
/// fake and handle are gone.
#[derive(Clone, Default)]
pub struct Controller {
    inner: Arc<Mutex<ControllerState>>,
}

#[derive(Default)]
struct ControllerState {
    next_receiver: u64,
    expected: Vec<Arc<Mutex<ExpectedCall>>>,
    finished: bool,
}

impl ControllerState {
    fn missing_calls(&self) -> Vec<String> {
        self.expected
            .iter()
            .map(|e| e.lock())
            .filter(|e| !e.satisfied())
            .map(|e| format!("{e:?}"))
            .collect()
    }
}

impl Drop for ControllerState {
    fn drop(&mut self) {
        if self.finished || std::thread::panicking() {
            return;
        }
        let missing = self.missing_calls();
        if !missing.is_empty() {
            tracing::warn!(count = missing.len(), "controller dropped with missing calls");
            panic!("{}", Error::MissingCalls(missing));
        }
    }
}

impl Controller {
    /// Create an empty controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an identity for a new fake.
    #[must_use]
    pub fn register(&self) -> ReceiverId {
        let mut state = self.inner.lock();
        let id = ReceiverId(state.next_receiver);
        state.next_receiver += 1;
        id
    }

    /// A recorder method for `signature` on `receiver`.
    #[must_use]
    pub fn call_ref(&self, receiver: ReceiverId, signature: MethodSignature) -> CallRef {
        CallRef::new(self.clone(), receiver, signature)
    }

    pub(crate) fn expect_call(
        &self,
        receiver: ReceiverId,
        signature: MethodSignature,
        args: Vec<ArgMatcher>,
    ) -> Call {
        tracing::debug!(method = signature.name(), args = args.len(), "expectation registered");
        let expected = Arc::new(Mutex::new(ExpectedCall::new(receiver, signature, args)));
        self.inner.lock().expected.push(Arc::clone(&expected));
        Call::new(expected)
    }

    /// Whether both handles share the same state.
    pub(crate) fn same_as(&self, other: &Controller) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of expectations registered so far.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        self.inner.lock().expected.len()
    }

    /// Resolve a call made on a fake.
    ///
    /// Expectations are tried in registration order; the first one for this
    /// receiver and method whose matchers fit and which still has calls left
    /// answers.
    ///
    /// # Errors
    ///
    /// - [`Error::UnexpectedCall`] if no expectation matches
    /// - [`Error::Exhausted`] if only used-up expectations match
    /// - [`Error::ReturnCount`] if a computed behavior returns the wrong
    ///   number of values
    pub fn try_call(
        &self,
        receiver: ReceiverId,
        signature: &MethodSignature,
        args: Vec<Value>,
    ) -> Result<Returns> {
        let resolution = self.select(receiver, signature, &args)?;

        let values = match resolution {
            Resolution::Default => vec![Value::nil(); signature.returns()],
            Resolution::Static(values) => values,
            Resolution::Computed(action) => {
                let values = action(&args);
                signature.check_returns(values.len())?;
                values
            }
        };
        Ok(Returns::new(values))
    }

    /// Resolve a call made on a fake, failing the test on a mismatch.
    ///
    /// # Panics
    ///
    /// Panics with the error [`try_call`](Self::try_call) would return.
    pub fn call(
        &self,
        receiver: ReceiverId,
        signature: &MethodSignature,
        args: Vec<Value>,
    ) -> Returns {
        self.try_call(receiver, signature, args)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Pick the expectation for a call and count it.
    ///
    /// Only the resolution is cloned out so computed behaviors run unlocked.
    fn select(
        &self,
        receiver: ReceiverId,
        signature: &MethodSignature,
        args: &[Value],
    ) -> Result<Resolution> {
        let state = self.inner.lock();
        let mut reasons = Vec::new();
        let mut exhausted = None;

        for expected in &state.expected {
            let mut expected = expected.lock();
            if !expected.is_for(receiver, signature) {
                continue;
            }
            if let Err(reason) = expected.matches(args) {
                reasons.push(format!("{expected:?}: {reason}"));
                continue;
            }
            if expected.exhausted() {
                exhausted.get_or_insert(expected.max_calls());
                continue;
            }
            expected.calls += 1;
            tracing::trace!(
                method = signature.name(),
                calls = expected.calls,
                resolution = expected.resolution.describe(),
                "call resolved"
            );
            return Ok(expected.resolution.clone());
        }

        let rendered = value::render(args);
        if let Some(max) = exhausted {
            return Err(Error::Exhausted {
                method: signature.name(),
                args: rendered,
                max,
            });
        }
        let reason = if reasons.is_empty() {
            "no expectations registered for this method".to_string()
        } else {
            reasons.join("; ")
        };
        Err(Error::UnexpectedCall {
            method: signature.name(),
            args: rendered,
            reason,
        })
    }

    /// Verify every expectation reached its minimum call count.
    ///
    /// After this the controller no longer verifies on drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCalls`] listing the unsatisfied expectations.
    pub fn finish(&self) -> Result<()> {
        let mut state = self.inner.lock();
        state.finished = true;
        let missing = state.missing_calls();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingCalls(missing))
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Controller")
            .field("receivers", &state.next_receiver)
            .field("expected", &state.expected.len())
            .field("finished", &state.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{any, arg};

    const GET: MethodSignature = MethodSignature::new("GetByString", 2, 2);
    const LIST: MethodSignature = MethodSignature::new("List", 2, 2).variadic();

    fn ctx_and(value: &'static str) -> Vec<Value> {
        vec![Value::new("ctx"), Value::new(value)]
    }

    #[test]
    fn test_default_resolution_is_nil_slots() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller.call_ref(receiver, GET).record(vec![any(), any()]).unwrap();

        let returns = controller.call(receiver, &GET, ctx_and("x"));
        assert_eq!(returns.len(), 2);
        assert!(returns.get(0).is_some_and(Value::is_nil));
        controller.finish().unwrap();
    }

    #[test]
    fn test_unexpected_call_without_expectations() {
        let controller = Controller::new();
        let receiver = controller.register();

        let err = controller.try_call(receiver, &GET, ctx_and("x")).unwrap_err();
        assert!(matches!(err, Error::UnexpectedCall { method: "GetByString", .. }));
        assert!(err.to_string().contains("no expectations registered"));
    }

    #[test]
    fn test_unexpected_call_lists_mismatch() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller
            .call_ref(receiver, GET)
            .record(vec![any(), arg("a")])
            .unwrap()
            .any_times();

        let err = controller.try_call(receiver, &GET, ctx_and("b")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("unexpected call to GetByString(\"ctx\", \"b\")"));
        assert!(message.contains("argument 1"));
    }

    #[test]
    fn test_exhausted_expectation() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller.call_ref(receiver, GET).record(vec![any(), any()]).unwrap().times(1);

        assert!(controller.try_call(receiver, &GET, ctx_and("x")).is_ok());
        let err = controller.try_call(receiver, &GET, ctx_and("x")).unwrap_err();
        assert!(matches!(err, Error::Exhausted { max: 1, .. }));
        controller.finish().unwrap();
    }

    #[test]
    fn test_expectations_tried_in_order() {
        let controller = Controller::new();
        let receiver = controller.register();
        let get = controller.call_ref(receiver, GET);
        get.record(vec![any(), any()])
            .unwrap()
            .returns(vec![Value::new("first"), Value::nil()])
            .unwrap()
            .times(1);
        get.record(vec![any(), any()])
            .unwrap()
            .returns(vec![Value::new("second"), Value::nil()])
            .unwrap()
            .any_times();

        let first = controller.call(receiver, &GET, ctx_and("x"));
        let second = controller.call(receiver, &GET, ctx_and("x"));
        assert_eq!(first.result::<String, String>(), Ok("first".to_string()));
        assert_eq!(second.result::<String, String>(), Ok("second".to_string()));
        controller.finish().unwrap();
    }

    #[test]
    fn test_receivers_are_isolated() {
        let controller = Controller::new();
        let a = controller.register();
        let b = controller.register();
        assert_ne!(a, b);

        controller.call_ref(a, GET).record(vec![any(), any()]).unwrap().any_times();
        assert!(controller.try_call(b, &GET, ctx_and("x")).is_err());
    }

    #[test]
    fn test_same_as_follows_clones() {
        let controller = Controller::new();
        assert!(controller.same_as(&controller.clone()));
        assert!(!controller.same_as(&Controller::new()));
    }

    #[test]
    fn test_computed_resolution_sees_arguments() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller
            .call_ref(receiver, LIST)
            .record(vec![any(), any(), any()])
            .unwrap()
            .do_and_return(|args| vec![Value::new(args.len() as i64), Value::nil()])
            .any_times();

        let args = vec![Value::new("ctx"), Value::new("id"), Value::new("a"), Value::new("b")];
        let returns = controller.call(receiver, &LIST, args);
        assert_eq!(returns.result::<i64, String>(), Ok(4));
    }

    #[test]
    fn test_computed_resolution_wrong_count() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller
            .call_ref(receiver, GET)
            .record(vec![any(), any()])
            .unwrap()
            .do_and_return(|_| vec![Value::nil()])
            .any_times();

        let err = controller.try_call(receiver, &GET, ctx_and("x")).unwrap_err();
        assert!(matches!(err, Error::ReturnCount { got: 1, want: 2, .. }));
    }

    #[test]
    fn test_computed_resolution_may_reenter() {
        let controller = Controller::new();
        let receiver = controller.register();
        let inner = controller.clone();
        controller
            .call_ref(receiver, LIST)
            .record(vec![any(), any(), any()])
            .unwrap()
            .do_and_return(move |_| {
                inner
                    .call(receiver, &GET, vec![Value::new("ctx"), Value::new("x")])
                    .into_values()
            })
            .any_times();
        controller
            .call_ref(receiver, GET)
            .record(vec![any(), any()])
            .unwrap()
            .returns(vec![Value::new("nested"), Value::nil()])
            .unwrap()
            .any_times();

        let returns = controller.call(receiver, &LIST, vec![Value::new("ctx"), Value::new("id")]);
        assert_eq!(returns.result::<String, String>(), Ok("nested".to_string()));
        controller.finish().unwrap();
    }

    #[test]
    fn test_finish_reports_missing_calls() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller.call_ref(receiver, GET).record(vec![any(), arg("a")]).unwrap().times(2);
        controller.call(receiver, &GET, ctx_and("a"));

        let err = controller.finish().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("missing call(s): GetByString(is anything, is equal to \"a\""));
        assert!(message.ends_with("expected 2 time(s), called 1"));
    }

    #[test]
    #[should_panic(expected = "missing call(s)")]
    fn test_drop_verifies_missing_calls() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller.call_ref(receiver, GET).record(vec![any(), any()]).unwrap();
    }

    #[test]
    fn test_times_zero_rejects_calls() {
        let controller = Controller::new();
        let receiver = controller.register();
        controller.call_ref(receiver, GET).record(vec![any(), any()]).unwrap().times(0);

        assert!(matches!(
            controller.try_call(receiver, &GET, ctx_and("x")),
            Err(Error::Exhausted { max: 0, .. })
        ));
    }
}
