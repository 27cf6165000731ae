//! Error definitions
//!
//! This module provides the error type shared by the expectation builder and
//! the controller that resolves calls made on fakes.

use thiserror::Error;

/// Main error type for service-mock
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The mock options carry no call reference.
    #[error(
        "mock options have no call; set one from the recorder, e.g. `mock.recorder().get_by_string()`"
    )]
    MissingCall,

    /// The call reference was taken from a fake under another controller.
    #[error("{method}: call reference belongs to a fake under another controller")]
    ForeignCall {
        /// Method name.
        method: &'static str,
    },

    /// The method has no parameter to bind the context to.
    #[error("{method}: method declares no context parameter")]
    MissingContext {
        /// Method name.
        method: &'static str,
    },

    /// A scalar input was given for a method with nothing after the context.
    #[error("{method}: scalar input needs a parameter after the context, use a list input instead")]
    ScalarInput {
        /// Method name.
        method: &'static str,
    },

    /// Wrong number of argument matchers for the method.
    #[error("{method}: wrong number of argument matchers: got {got}, want {want}")]
    ArgumentCount {
        /// Method name.
        method: &'static str,
        /// Matchers supplied.
        got: usize,
        /// Human readable expectation, e.g. `3` or `at least 2`.
        want: String,
    },

    /// Wrong number of return values for the method.
    #[error("{method}: wrong number of return values: got {got}, want {want}")]
    ReturnCount {
        /// Method name.
        method: &'static str,
        /// Values supplied.
        got: usize,
        /// Values the method returns.
        want: usize,
    },

    /// No expectation matched a call.
    #[error("unexpected call to {method}({args}): {reason}")]
    UnexpectedCall {
        /// Method name.
        method: &'static str,
        /// Rendered call arguments.
        args: String,
        /// Why each candidate expectation was rejected.
        reason: String,
    },

    /// Only exhausted expectations matched a call.
    #[error("{method}({args}) has already been called the max number of times ({max})")]
    Exhausted {
        /// Method name.
        method: &'static str,
        /// Rendered call arguments.
        args: String,
        /// Maximum the expectation allowed.
        max: usize,
    },

    /// Expectations whose minimum call count was not met.
    #[error("missing call(s): {}", .0.join("; "))]
    MissingCalls(Vec<String>),

    /// A return slot holds a value of another type.
    #[error("cannot use {found} as {expected}")]
    ValueType {
        /// Requested type.
        expected: &'static str,
        /// Type actually stored.
        found: &'static str,
    },

    /// A return slot index past the end of the returned values.
    #[error("return slot {index} out of range ({len} values)")]
    SlotOutOfRange {
        /// Requested slot.
        index: usize,
        /// Slots available.
        len: usize,
    },
}

impl Error {
    /// Create an argument count error.
    #[must_use]
    pub fn argument_count(method: &'static str, got: usize, want: impl Into<String>) -> Self {
        Self::ArgumentCount {
            method,
            got,
            want: want.into(),
        }
    }

    /// Whether this error is a test-authoring mistake caught at configuration time.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCall
                | Self::ForeignCall { .. }
                | Self::MissingContext { .. }
                | Self::ScalarInput { .. }
                | Self::ArgumentCount { .. }
                | Self::ReturnCount { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
