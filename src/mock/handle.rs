//! The Mock Handle: a fake client, its recorder and the controller behind them.

use crate::controller::{Call, Controller};
use crate::error::{Error, Result};

use super::builder::configure;
use super::options::MockOptions;

/// A fake service client that exposes a recorder.
///
/// The recorder mirrors the client's method set; each recorder method returns
/// the [`CallRef`](crate::controller::CallRef) expectations are declared
/// against.
pub trait ServiceClient {
    /// The recorder type.
    type Recorder;

    /// The recorder for this fake.
    fn expect(&self) -> &Self::Recorder;
}

/// Owns one fake client and the controller that verifies it.
///
/// # Example
///
/// ```rust,ignore
/// let mock = MockHandle::new(MockExampleService::new);
///
/// mock.mock(
///     MockOptions::new(mock.recorder().get_by_string())
///         .input("Hello World")
///         .returns("Mocked Output")
///         .times(1),
/// );
///
/// let output = mock.client().get_by_string(&Context::default(), "Hello World");
/// assert_eq!(output, Ok("Mocked Output".to_string()));
/// ```
#[derive(Debug)]
pub struct MockHandle<T> {
    controller: Controller,
    client: T,
}

impl<T: ServiceClient> MockHandle<T> {
    /// Build the fake under a fresh controller.
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce(&Controller) -> T,
    {
        Self::with_controller(&Controller::new(), factory)
    }

    /// Build the fake under an existing controller, sharing its verification
    /// scope with other fakes.
    pub fn with_controller<F>(controller: &Controller, factory: F) -> Self
    where
        F: FnOnce(&Controller) -> T,
    {
        Self {
            client: factory(controller),
            controller: controller.clone(),
        }
    }

    /// Build the fake with a fallible factory.
    ///
    /// # Errors
    ///
    /// Returns whatever the factory returns.
    pub fn try_new<F, E>(factory: F) -> std::result::Result<Self, E>
    where
        F: FnOnce(&Controller) -> std::result::Result<T, E>,
    {
        let controller = Controller::new();
        let client = factory(&controller)?;
        Ok(Self { controller, client })
    }

    /// The fake, to hand to the code under test.
    pub fn client(&self) -> &T {
        &self.client
    }

    /// The recorder whose methods are passed as [`MockOptions::call`].
    pub fn recorder(&self) -> &T::Recorder {
        self.client.expect()
    }

    /// The controller resolving calls on the fake.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Declare an expected call.
    ///
    /// # Panics
    ///
    /// Panics if the options are malformed: no call reference, or inputs or
    /// returns that do not fit the method.
    pub fn mock(&self, options: MockOptions) -> &Self {
        self.try_mock(options).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Declare an expected call, returning configuration errors.
    ///
    /// # Errors
    ///
    /// See [`configure`].
    pub fn try_mock(&self, options: MockOptions) -> Result<&Self> {
        self.expect_call(options)?;
        Ok(self)
    }

    /// Declare an expected call and keep its handle for further tuning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignCall`] if the call reference comes from a fake
    /// under another controller, otherwise see [`configure`].
    pub fn expect_call(&self, options: MockOptions) -> Result<Call> {
        if let Some(call) = &options.call {
            if !call.controller().same_as(&self.controller) {
                return Err(Error::ForeignCall {
                    method: call.signature().name(),
                });
            }
        }
        configure(options)
    }

    /// Verify declared call counts now instead of at drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCalls`](crate::Error::MissingCalls) if an
    /// expectation was called fewer times than declared.
    pub fn finish(&self) -> Result<()> {
        self.controller.finish()
    }
}
