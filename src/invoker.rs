//! Dynamic script invocation over an embedded JavaScript engine.
//!
//! The invoker compiles script text as the body of an async function, calls it
//! with the supplied arguments bound positionally, and settles the resulting
//! promise into a single success-or-failure outcome. Whether the body actually
//! suspends is a black-box property of the engine; every invocation goes
//! through the same promise path.

use rquickjs::function::Rest;
use rquickjs::{async_with, AsyncContext, AsyncRuntime, CatchResultExt, Function, Promise, Value};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use crate::config::InvokerConfig;
use crate::error::{InvokeError, Result};
use crate::marshal::{js_to_json, json_to_js};

/// Wrap script text as a callable unit.
///
/// The async function wrapper is the engine-level equivalent of constructing
/// with `AsyncFunction`: plain returns and internal `await`s both surface as a
/// promise. Arguments are reachable through the function's `arguments` object.
/// The newline before the closing brace keeps a trailing line comment in the
/// script from swallowing the wrapper.
pub(crate) fn callable_source(script: &str) -> String {
    format!("(async function () {{\n{script}\n}})")
}

/// A reusable script invoker owning one engine runtime and context.
///
/// The context is the hosting environment for everything the scripts mutate:
/// global state written by one invocation is visible to the next on the same
/// invoker. Use [`invoke_once`] for a clean environment per call.
pub struct ScriptInvoker {
    context: AsyncContext,
    _runtime: AsyncRuntime,
}

impl ScriptInvoker {
    /// Build an invoker with default engine limits.
    pub async fn new() -> Result<Self> {
        Self::with_config(InvokerConfig::default()).await
    }

    /// Build an invoker with the given engine configuration.
    pub async fn with_config(config: InvokerConfig) -> Result<Self> {
        let runtime = AsyncRuntime::new()?;
        if let Some(limit) = config.memory_limit {
            runtime.set_memory_limit(limit).await;
        }
        if let Some(size) = config.max_stack_size {
            runtime.set_max_stack_size(size).await;
        }
        let context = AsyncContext::full(&runtime).await?;
        Ok(Self {
            context,
            _runtime: runtime,
        })
    }

    /// Invoke `script` with `args` bound positionally.
    ///
    /// Returns a deferred result that settles exactly once: `Ok` with the value
    /// the script ultimately produced, or `Err` with the failure - whether the
    /// script text failed to compile, threw synchronously, or its own deferred
    /// work rejected later. Nothing escapes this call as a panic, and nothing
    /// runs before the returned future is polled.
    #[instrument(skip_all, fields(script_len = script.len(), arg_count = args.len()))]
    pub async fn invoke(&self, script: &str, args: &[JsonValue]) -> Result<JsonValue> {
        let source = callable_source(script);
        debug!(event_type = "invoke_start", "Invoking script");

        let outcome: Result<JsonValue> = async_with!(self.context => |ctx| {
            let callable = match ctx.eval::<Function, _>(source).catch(&ctx) {
                Ok(callable) => callable,
                Err(caught) => return Err(InvokeError::from_caught(caught)),
            };

            let js_args = args
                .iter()
                .map(|arg| json_to_js(&ctx, arg))
                .collect::<rquickjs::Result<Vec<Value>>>()?;

            let promise = match callable
                .call::<_, Promise>((Rest(js_args),))
                .catch(&ctx)
            {
                Ok(promise) => promise,
                Err(caught) => return Err(InvokeError::from_caught(caught)),
            };

            match promise.into_future::<Value>().await.catch(&ctx) {
                Ok(value) => js_to_json(&value),
                Err(caught) => Err(InvokeError::from_caught(caught)),
            }
        })
        .await;

        match &outcome {
            Ok(_) => debug!(event_type = "invoke_settled", success = true, "Script settled"),
            Err(error) => warn!(
                event_type = "invoke_settled",
                success = false,
                error = %error,
                "Script settled with failure"
            ),
        }
        outcome
    }
}

/// Invoke a script in a fresh engine, retaining nothing afterward.
///
/// One-shot equivalent of [`ScriptInvoker::invoke`]: the engine and context
/// live only for the duration of this call.
pub async fn invoke_once(script: &str, args: &[JsonValue]) -> Result<JsonValue> {
    ScriptInvoker::new().await?.invoke(script, args).await
}

#[cfg(test)]
#[path = "invoker_tests.rs"]
mod tests;
