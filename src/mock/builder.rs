//! Turns [`MockOptions`] into a registered, configured expectation.

use crate::controller::{Action, Call, MethodSignature};
use crate::error::{Error, Result};
use crate::matcher::{self, ArgMatcher};
use crate::value::Value;

use super::options::{Input, MockOptions, Output};

/// How a configured expectation answers.
enum Mode {
    Computed(Action),
    Static(Vec<Value>),
}

/// Register and configure the expectation `options` describe.
///
/// Arguments are shaped from the call's signature, the return slots are
/// checked before anything is registered, then the resolution mode and the
/// count policy are applied.
///
/// # Errors
///
/// - [`Error::MissingCall`] if no call reference is set
/// - [`Error::MissingContext`], [`Error::ScalarInput`] or
///   [`Error::ArgumentCount`] if the input does not fit the signature
/// - [`Error::ReturnCount`] if the return slots do not fit the signature
pub fn configure(options: MockOptions) -> Result<Call> {
    let MockOptions {
        ctx,
        call,
        input,
        returns,
        error,
        single_error_returned,
        do_and_return,
        times,
        any_times,
    } = options;

    let call_ref = call.ok_or(Error::MissingCall)?;
    let signature = *call_ref.signature();
    let ctx = ctx.unwrap_or_else(matcher::any);

    let args = bind_arguments(&signature, ctx, input)?;
    let mode = match do_and_return {
        Some(action) => Mode::Computed(action),
        None => Mode::Static(return_slots(
            &signature,
            returns,
            error,
            single_error_returned,
        )?),
    };

    let expected = call_ref.record(args)?;
    match mode {
        Mode::Computed(action) => {
            tracing::debug!(method = signature.name(), "returns computed values");
            expected.do_and_return_shared(action);
        }
        Mode::Static(slots) => {
            tracing::debug!(
                method = signature.name(),
                slots = slots.len(),
                single_error = single_error_returned,
                "returns static values"
            );
            expected.returns(slots)?;
        }
    }

    if any_times {
        expected.any_times();
    } else {
        expected.times(times);
    }
    Ok(expected)
}

/// Build the argument matchers for a call.
///
/// Slot 0 is always the context matcher. With no input the remaining
/// parameters match anything; a list fills the slots after the context in
/// order; a scalar binds the second parameter and leaves the variadic tail
/// out, so only calls without variadic arguments match.
pub(crate) fn bind_arguments(
    signature: &MethodSignature,
    ctx: ArgMatcher,
    input: Input,
) -> Result<Vec<ArgMatcher>> {
    if signature.params() == 0 {
        return Err(Error::MissingContext {
            method: signature.name(),
        });
    }

    let args = match input {
        Input::None => {
            let mut args = Vec::with_capacity(signature.params());
            args.push(ctx);
            args.resize_with(signature.params(), matcher::any);
            args
        }
        Input::List(values) => {
            let mut args = Vec::with_capacity(values.len() + 1);
            args.push(ctx);
            args.extend(values);
            args
        }
        Input::One(value) => {
            let fixed = signature.fixed_params();
            if fixed < 2 {
                return Err(Error::ScalarInput {
                    method: signature.name(),
                });
            }
            let mut args = Vec::with_capacity(fixed);
            args.push(ctx);
            args.push(value);
            args.resize_with(fixed, matcher::any);
            args
        }
    };
    Ok(args)
}

/// Build the static return slots: the error alone, or the values followed
/// by the error.
pub(crate) fn return_slots(
    signature: &MethodSignature,
    returns: Output,
    error: Option<Value>,
    single_error_returned: bool,
) -> Result<Vec<Value>> {
    let error = error.unwrap_or_else(Value::nil);
    let slots = if single_error_returned {
        vec![error]
    } else {
        let mut slots = returns.into_slots();
        slots.push(error);
        slots
    };
    signature.check_returns(slots.len())?;
    Ok(slots)
}
