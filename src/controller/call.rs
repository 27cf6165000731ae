//! Registered expectations and how they match calls.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::matcher::{ArgMatcher, Matcher};
use crate::value::{self, Value};

use super::{MethodSignature, ReceiverId};

/// Computed behavior: receives the actual call arguments (context first,
/// variadic tail flattened) and produces every return slot.
pub type Action = Arc<dyn Fn(&[Value]) -> Vec<Value> + Send + Sync>;

/// How many times an expectation may be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cardinality {
    min: usize,
    /// `None` means unbounded.
    max: Option<usize>,
}

impl Cardinality {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub(crate) const fn any() -> Self {
        Self { min: 0, max: None }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{}..={max}", self.min),
            None => write!(f, "{}..", self.min),
        }
    }
}

#[derive(Clone)]
pub(crate) enum Resolution {
    /// `nil` in every slot.
    Default,
    Static(Vec<Value>),
    Computed(Action),
}

impl Resolution {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Static(_) => "static",
            Self::Computed(_) => "computed",
        }
    }
}

pub(crate) struct ExpectedCall {
    pub(crate) receiver: ReceiverId,
    pub(crate) signature: MethodSignature,
    args: Vec<ArgMatcher>,
    pub(crate) resolution: Resolution,
    cardinality: Cardinality,
    pub(crate) calls: usize,
}

impl ExpectedCall {
    pub(crate) fn new(
        receiver: ReceiverId,
        signature: MethodSignature,
        args: Vec<ArgMatcher>,
    ) -> Self {
        Self {
            receiver,
            signature,
            args,
            resolution: Resolution::Default,
            cardinality: Cardinality::exactly(1),
            calls: 0,
        }
    }

    pub(crate) fn is_for(&self, receiver: ReceiverId, signature: &MethodSignature) -> bool {
        self.receiver == receiver && self.signature.name() == signature.name()
    }

    pub(crate) fn satisfied(&self) -> bool {
        self.calls >= self.cardinality.min
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.cardinality.max.is_some_and(|max| self.calls >= max)
    }

    pub(crate) fn max_calls(&self) -> usize {
        self.cardinality.max.unwrap_or(usize::MAX)
    }

    /// Check the actual arguments against the matchers.
    ///
    /// Returns a description of the first mismatch.
    pub(crate) fn matches(&self, actual: &[Value]) -> std::result::Result<(), String> {
        let fixed = if self.signature.is_variadic() {
            self.signature.fixed_params()
        } else {
            self.args.len()
        };

        if actual.len() < fixed || (!self.signature.is_variadic() && actual.len() != fixed) {
            return Err(format!(
                "got {} arguments, want {}",
                actual.len(),
                self.args.len()
            ));
        }

        for (i, (matcher, value)) in self.args.iter().zip(actual).take(fixed).enumerate() {
            if !matcher.matches(value) {
                return Err(format!("argument {i}: {}", matcher.describe_mismatch(value)));
            }
        }

        if self.signature.is_variadic() {
            match_tail(&self.args[fixed..], &actual[fixed..])?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let args: Vec<_> = self.args.iter().map(|m| m.describe()).collect();
        format!(
            "{}({}) expected {} time(s), called {}",
            self.signature.name(),
            args.join(", "),
            self.cardinality,
            self.calls
        )
    }
}

impl Debug for ExpectedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Match the variadic tail.
///
/// Equal counts match one to one. Otherwise every matcher but the last
/// matches one value and the last one is tried against the rest as a list,
/// so a single `any()` accepts any tail, the empty one included.
fn match_tail(matchers: &[ArgMatcher], values: &[Value]) -> std::result::Result<(), String> {
    if matchers.len() == values.len() && matchers.iter().zip(values).all(|(m, v)| m.matches(v)) {
        return Ok(());
    }

    let Some((last, head)) = matchers.split_last() else {
        return Err(format!("got {} variadic arguments, want none", values.len()));
    };
    if values.len() < head.len() {
        return Err(format!(
            "got {} variadic arguments, want at least {}",
            values.len(),
            head.len()
        ));
    }

    for (i, (matcher, value)) in head.iter().zip(values).enumerate() {
        if !matcher.matches(value) {
            return Err(format!("variadic argument {i}: {}", matcher.describe_mismatch(value)));
        }
    }

    let rest = Value::list(values[head.len()..].to_vec());
    if last.matches(&rest) {
        Ok(())
    } else {
        Err(format!(
            "variadic arguments [{}]: {}",
            value::render(&values[head.len()..]),
            last.describe_mismatch(&rest)
        ))
    }
}

/// A registered expectation.
///
/// Returned by [`CallRef::record`](super::CallRef::record); every setter
/// returns `&Self` so configuration chains.
#[derive(Clone)]
pub struct Call {
    inner: Arc<Mutex<ExpectedCall>>,
}

impl Call {
    pub(crate) fn new(inner: Arc<Mutex<ExpectedCall>>) -> Self {
        Self { inner }
    }

    /// Compute the return values at call time.
    ///
    /// The action replaces any static return values.
    pub fn do_and_return<F>(&self, action: F) -> &Self
    where
        F: Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.inner.lock().resolution = Resolution::Computed(Arc::new(action));
        self
    }

    /// Compute the return values at call time with a shared action.
    pub fn do_and_return_shared(&self, action: Action) -> &Self {
        self.inner.lock().resolution = Resolution::Computed(action);
        self
    }

    /// Return these values, one per return slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReturnCount`](crate::Error::ReturnCount) if the count
    /// does not match the method's return slots.
    pub fn returns(&self, values: Vec<Value>) -> Result<&Self> {
        let mut inner = self.inner.lock();
        inner.signature.check_returns(values.len())?;
        inner.resolution = Resolution::Static(values);
        drop(inner);
        Ok(self)
    }

    /// Expect exactly `n` calls. Zero means the method must not be called.
    pub fn times(&self, n: usize) -> &Self {
        self.inner.lock().cardinality = Cardinality::exactly(n);
        self
    }

    /// Allow any number of calls, none included.
    pub fn any_times(&self) -> &Self {
        self.inner.lock().cardinality = Cardinality::any();
        self
    }

    /// Expect at least `n` calls.
    pub fn min_times(&self, n: usize) -> &Self {
        let mut inner = self.inner.lock();
        inner.cardinality.min = n;
        if inner.cardinality.max.is_some_and(|max| max < n) {
            inner.cardinality.max = Some(n);
        }
        drop(inner);
        self
    }

    /// Expect at most `n` calls.
    pub fn max_times(&self, n: usize) -> &Self {
        let mut inner = self.inner.lock();
        inner.cardinality.max = Some(n);
        if inner.cardinality.min > n {
            inner.cardinality.min = n;
        }
        drop(inner);
        self
    }

    /// Number of calls resolved by this expectation so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.lock().calls
    }

    /// Whether the minimum call count has been reached.
    #[must_use]
    pub fn satisfied(&self) -> bool {
        self.inner.lock().satisfied()
    }

    /// Whether the maximum call count has been reached.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.inner.lock().exhausted()
    }
}

impl Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Call").field(&*self.inner.lock()).finish()
    }
}
