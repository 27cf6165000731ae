//! Declarative expectations for fake service clients.
//!
//! - [`MockHandle`] - holds a fake client and its recorder
//! - [`MockOptions`] - describes one expected call
//! - [`configure`] - registers and configures the expectation
//!
//! # Declaring expectations
//!
//! ```rust
//! use service_mock::controller::{CallRef, Controller, MethodSignature, ReceiverId};
//! use service_mock::mock::{MockHandle, MockOptions, ServiceClient};
//! use service_mock::value::Value;
//!
//! const LOOKUP: MethodSignature = MethodSignature::new("Lookup", 2, 2);
//!
//! struct Recorder(Controller, ReceiverId);
//!
//! impl Recorder {
//!     fn lookup(&self) -> CallRef {
//!         self.0.call_ref(self.1, LOOKUP)
//!     }
//! }
//!
//! struct FakeDirectory(Recorder);
//!
//! impl FakeDirectory {
//!     fn new(controller: &Controller) -> Self {
//!         Self(Recorder(controller.clone(), controller.register()))
//!     }
//!
//!     fn lookup(&self, ctx: &str, name: &str) -> Result<String, String> {
//!         let Recorder(controller, receiver) = &self.0;
//!         let args = vec![Value::new(ctx.to_string()), Value::new(name.to_string())];
//!         controller.call(*receiver, &LOOKUP, args).result()
//!     }
//! }
//!
//! impl ServiceClient for FakeDirectory {
//!     type Recorder = Recorder;
//!
//!     fn expect(&self) -> &Recorder {
//!         &self.0
//!     }
//! }
//!
//! let mock = MockHandle::new(FakeDirectory::new);
//! mock.mock(
//!     MockOptions::new(mock.recorder().lookup())
//!         .input("alice")
//!         .returns("alice@example.com")
//!         .times(1),
//! );
//!
//! assert_eq!(mock.client().lookup("ctx", "alice"), Ok("alice@example.com".to_string()));
//! ```

mod builder;
mod handle;
mod options;

pub use builder::configure;
pub use handle::{MockHandle, ServiceClient};
pub use options::{Input, MockOptions, Output};
