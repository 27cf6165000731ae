//! Example service and its fake, shared by the integration tests.

#![allow(dead_code)]

use service_mock::controller::{CallRef, Controller, MethodSignature, ReceiverId, Returns};
use service_mock::mock::ServiceClient;
use service_mock::value::Value;

/// Request-scoped metadata passed as the first argument of every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub request_id: String,
}

impl Context {
    pub fn new(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    pub id: String,
    pub value: String,
}

impl Example {
    pub fn new(id: &str, value: &str) -> Self {
        Self {
            id: id.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("example service: {0}")]
pub struct ExampleError(pub String);

/// The service interface the code under test depends on.
pub trait ExampleService {
    fn get_by_string(&self, ctx: &Context, s: &str) -> Result<String, ExampleError>;

    fn get_by_int(&self, ctx: &Context, i: i64) -> Result<i64, ExampleError>;

    fn get_with_variadic(
        &self,
        ctx: &Context,
        id: &str,
        options: &[&str],
    ) -> Result<i64, ExampleError>;

    fn single_error(&self, ctx: &Context, id: &str, options: &[&str]) -> Result<(), ExampleError>;

    fn with_struct(
        &self,
        ctx: &Context,
        input: Option<&Example>,
    ) -> Result<Option<Example>, ExampleError>;

    fn with_do_and_return(
        &self,
        ctx: &Context,
        input: Option<&Example>,
    ) -> Result<Option<Example>, ExampleError>;

    fn any(
        &self,
        ctx: &Context,
        input: Option<&Example>,
        options: &[&str],
    ) -> Result<Option<Example>, ExampleError>;
}

const GET_BY_STRING: MethodSignature = MethodSignature::new("GetByString", 2, 2);
const GET_BY_INT: MethodSignature = MethodSignature::new("GetByInt", 2, 2);
const GET_WITH_VARIADIC: MethodSignature = MethodSignature::new("GetWithVariadic", 3, 2).variadic();
const SINGLE_ERROR: MethodSignature = MethodSignature::new("SingleError", 3, 1).variadic();
const WITH_STRUCT: MethodSignature = MethodSignature::new("WithStruct", 2, 2);
const WITH_DO_AND_RETURN: MethodSignature = MethodSignature::new("WithDoAndReturn", 2, 2);
const ANY: MethodSignature = MethodSignature::new("Any", 3, 2).variadic();

/// Fake [`ExampleService`], written the way generated fakes are.
#[derive(Debug)]
pub struct MockExampleService {
    controller: Controller,
    receiver: ReceiverId,
    recorder: MockExampleServiceRecorder,
}

/// Recorder for [`MockExampleService`].
#[derive(Debug)]
pub struct MockExampleServiceRecorder {
    controller: Controller,
    receiver: ReceiverId,
}

impl MockExampleService {
    pub fn new(controller: &Controller) -> Self {
        let receiver = controller.register();
        Self {
            controller: controller.clone(),
            receiver,
            recorder: MockExampleServiceRecorder {
                controller: controller.clone(),
                receiver,
            },
        }
    }

    fn call(&self, signature: &MethodSignature, args: Vec<Value>) -> Returns {
        self.controller.call(self.receiver, signature, args)
    }
}

fn ctx_value(ctx: &Context) -> Value {
    Value::new(ctx.clone())
}

fn variadic(args: &mut Vec<Value>, options: &[&str]) {
    args.extend(options.iter().map(|o| Value::new((*o).to_string())));
}

impl ExampleService for MockExampleService {
    fn get_by_string(&self, ctx: &Context, s: &str) -> Result<String, ExampleError> {
        self.call(&GET_BY_STRING, vec![ctx_value(ctx), Value::new(s.to_string())])
            .result()
    }

    fn get_by_int(&self, ctx: &Context, i: i64) -> Result<i64, ExampleError> {
        self.call(&GET_BY_INT, vec![ctx_value(ctx), Value::new(i)]).result()
    }

    fn get_with_variadic(
        &self,
        ctx: &Context,
        id: &str,
        options: &[&str],
    ) -> Result<i64, ExampleError> {
        let mut args = vec![ctx_value(ctx), Value::new(id.to_string())];
        variadic(&mut args, options);
        self.call(&GET_WITH_VARIADIC, args).result()
    }

    fn single_error(&self, ctx: &Context, id: &str, options: &[&str]) -> Result<(), ExampleError> {
        let mut args = vec![ctx_value(ctx), Value::new(id.to_string())];
        variadic(&mut args, options);
        self.call(&SINGLE_ERROR, args).unit_result()
    }

    fn with_struct(
        &self,
        ctx: &Context,
        input: Option<&Example>,
    ) -> Result<Option<Example>, ExampleError> {
        self.call(&WITH_STRUCT, vec![ctx_value(ctx), Value::from_option(input.cloned())])
            .option_result()
    }

    fn with_do_and_return(
        &self,
        ctx: &Context,
        input: Option<&Example>,
    ) -> Result<Option<Example>, ExampleError> {
        self.call(
            &WITH_DO_AND_RETURN,
            vec![ctx_value(ctx), Value::from_option(input.cloned())],
        )
        .option_result()
    }

    fn any(
        &self,
        ctx: &Context,
        input: Option<&Example>,
        options: &[&str],
    ) -> Result<Option<Example>, ExampleError> {
        let mut args = vec![ctx_value(ctx), Value::from_option(input.cloned())];
        variadic(&mut args, options);
        self.call(&ANY, args).option_result()
    }
}

impl ServiceClient for MockExampleService {
    type Recorder = MockExampleServiceRecorder;

    fn expect(&self) -> &MockExampleServiceRecorder {
        &self.recorder
    }
}

impl MockExampleServiceRecorder {
    fn call_ref(&self, signature: MethodSignature) -> CallRef {
        self.controller.call_ref(self.receiver, signature)
    }

    pub fn get_by_string(&self) -> CallRef {
        self.call_ref(GET_BY_STRING)
    }

    pub fn get_by_int(&self) -> CallRef {
        self.call_ref(GET_BY_INT)
    }

    pub fn get_with_variadic(&self) -> CallRef {
        self.call_ref(GET_WITH_VARIADIC)
    }

    pub fn single_error(&self) -> CallRef {
        self.call_ref(SINGLE_ERROR)
    }

    pub fn with_struct(&self) -> CallRef {
        self.call_ref(WITH_STRUCT)
    }

    pub fn with_do_and_return(&self) -> CallRef {
        self.call_ref(WITH_DO_AND_RETURN)
    }

    pub fn any(&self) -> CallRef {
        self.call_ref(ANY)
    }
}

/// Install a test-writer subscriber so expectation logs show up with
/// `--nocapture`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
