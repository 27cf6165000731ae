//! Method signatures and recorder call references.

use crate::error::{Error, Result};
use crate::matcher::ArgMatcher;

use super::call::Call;
use super::{Controller, ReceiverId};

/// Shape of one service method, as declared by its fake.
///
/// `params` counts every declared parameter: the leading context, the fixed
/// parameters and, for a variadic method, the variadic slot. `returns`
/// counts every return slot, the trailing error included.
///
/// # Example
///
/// ```rust
/// use service_mock::controller::MethodSignature;
///
/// // fn get_with_variadic(ctx, id, options...) -> (i64, error)
/// const SIG: MethodSignature = MethodSignature::new("GetWithVariadic", 3, 2).variadic();
///
/// assert!(SIG.is_variadic());
/// assert_eq!(SIG.fixed_params(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    name: &'static str,
    params: usize,
    variadic: bool,
    returns: usize,
}

impl MethodSignature {
    /// Declare a method with `params` parameters and `returns` return slots.
    #[must_use]
    pub const fn new(name: &'static str, params: usize, returns: usize) -> Self {
        Self {
            name,
            params,
            variadic: false,
            returns,
        }
    }

    /// Mark the last parameter as variadic.
    #[must_use]
    pub const fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Method name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter count, variadic slot included.
    #[must_use]
    pub const fn params(&self) -> usize {
        self.params
    }

    /// Parameter count without the variadic slot.
    #[must_use]
    pub const fn fixed_params(&self) -> usize {
        if self.variadic && self.params > 0 {
            self.params - 1
        } else {
            self.params
        }
    }

    /// Whether the last parameter is variadic.
    #[must_use]
    pub const fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Return slot count.
    #[must_use]
    pub const fn returns(&self) -> usize {
        self.returns
    }

    /// Check a matcher list against the parameters.
    ///
    /// Fixed methods take exactly `params` matchers; variadic methods take at
    /// least the fixed ones, the rest describing the tail.
    pub(crate) fn check_arguments(&self, got: usize) -> Result<()> {
        if self.variadic {
            if got < self.fixed_params() {
                return Err(Error::argument_count(
                    self.name,
                    got,
                    format!("at least {}", self.fixed_params()),
                ));
            }
        } else if got != self.params {
            return Err(Error::argument_count(self.name, got, self.params.to_string()));
        }
        Ok(())
    }

    /// Check a return value list against the return slots.
    pub(crate) fn check_returns(&self, got: usize) -> Result<()> {
        if got == self.returns {
            Ok(())
        } else {
            Err(Error::ReturnCount {
                method: self.name,
                got,
                want: self.returns,
            })
        }
    }
}

/// A recorder method: the handle an expectation is declared against.
///
/// Recorders hand these out, one per service method; the expectation builder
/// reads the signature to shape arguments and then records the expectation.
#[derive(Debug, Clone)]
pub struct CallRef {
    controller: Controller,
    receiver: ReceiverId,
    signature: MethodSignature,
}

impl CallRef {
    pub(crate) fn new(
        controller: Controller,
        receiver: ReceiverId,
        signature: MethodSignature,
    ) -> Self {
        Self {
            controller,
            receiver,
            signature,
        }
    }

    /// The method this reference points at.
    #[must_use]
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub(crate) fn controller(&self) -> &Controller {
        &self.controller
    }

    /// The fake instance this reference belongs to.
    #[must_use]
    pub fn receiver(&self) -> ReceiverId {
        self.receiver
    }

    /// Register an expectation for this method with the given argument matchers.
    ///
    /// The expectation returns `nil` in every slot and is expected exactly
    /// once until configured otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentCount`] if the matcher count does not fit the
    /// signature; nothing is registered in that case.
    pub fn record(&self, args: Vec<ArgMatcher>) -> Result<Call> {
        self.signature.check_arguments(args.len())?;
        Ok(self.controller.expect_call(self.receiver, self.signature, args))
    }
}
