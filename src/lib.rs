//! # service-mock
//!
//! > Declarative expectations for service-client test doubles
//!
//! **service-mock** lets a test describe one expected call (its arguments,
//! return values, error, call count or computed behavior) in a single
//! options value instead of hand-driving the expectation API for every
//! method signature.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use service_mock::prelude::*;
//!
//! let mock = MockHandle::new(MockExampleService::new);
//!
//! mock.mock(
//!     MockOptions::new(mock.recorder().get_by_string())
//!         .input("Hello World")
//!         .returns("Mocked Output")
//!         .times(1),
//! );
//!
//! let output = mock.client().get_by_string(&ctx, "Hello World");
//! assert_eq!(output, Ok("Mocked Output".to_string()));
//! ```
//!
//! ## Features
//!
//! - **Argument binding** - no input, one input or an ordered list, with
//!   variadic tails
//! - **Return shapes** - value plus error, error only, or computed at call time
//! - **Call counts** - exact counts or any number of times, verified at scope end
//! - **Matchers** - wildcards, equality, predicates and combinators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod error;
pub mod matcher;
pub mod mock;
pub mod value;

/// Prelude for convenient imports
///
/// ```rust
/// use service_mock::prelude::*;
/// ```
pub mod prelude {
    pub use crate::args;
    pub use crate::controller::{CallRef, Controller, MethodSignature, ReceiverId, Returns};
    pub use crate::error::{Error, Result};
    pub use crate::matcher::{any, arg, eq, nil, ArgMatcher, Matcher};
    pub use crate::mock::{Input, MockHandle, MockOptions, Output, ServiceClient};
    pub use crate::value::{IntoValue, Value};
}

// Re-exports
pub use error::{Error, Result};
pub use mock::{configure, MockHandle, MockOptions};
