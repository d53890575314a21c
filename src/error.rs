use rquickjs::CaughtError;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::marshal::js_to_json;

/// Domain-specific errors for script invocation.
///
/// Every failure path of an invocation - malformed script text, a synchronous
/// throw, or an asynchronous rejection - funnels into `Script`. The other
/// variants cover the host side of the embedding boundary.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The script threw, or its deferred work eventually rejected.
    #[error("script failed: {message}")]
    Script {
        message: String,
        /// The thrown value, marshalled to JSON.
        thrown: JsonValue,
        stack: Option<String>,
    },

    /// Engine-internal failure (runtime allocation, context creation).
    #[error("engine error: {0}")]
    Engine(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The script produced a value with no JSON representation.
    #[error("unrepresentable result: {0}")]
    Marshal(String),
}

pub type Result<T> = std::result::Result<T, InvokeError>;

impl InvokeError {
    /// True for failures that originate inside the executed script, as opposed
    /// to host-side engine or marshalling failures.
    pub fn is_script_failure(&self) -> bool {
        matches!(self, Self::Script { .. })
    }

    /// Convert a caught engine error into an invocation failure.
    ///
    /// Error objects carry a message and (usually) a stack; any other thrown
    /// value is marshalled verbatim so the caller sees exactly what the script
    /// threw.
    pub(crate) fn from_caught(caught: CaughtError<'_>) -> Self {
        match caught {
            CaughtError::Exception(exception) => {
                let message = exception
                    .message()
                    .unwrap_or_else(|| "unknown script exception".to_string());
                let stack = exception.stack();
                let thrown = match &stack {
                    Some(stack) => json!({ "message": message, "stack": stack }),
                    None => json!({ "message": message }),
                };
                Self::Script {
                    message,
                    thrown,
                    stack,
                }
            }
            CaughtError::Value(value) => {
                let thrown = js_to_json(&value).unwrap_or(JsonValue::Null);
                Self::Script {
                    message: thrown.to_string(),
                    thrown,
                    stack: None,
                }
            }
            CaughtError::Error(error) => Self::Engine(error.to_string()),
        }
    }
}

impl From<rquickjs::Error> for InvokeError {
    fn from(error: rquickjs::Error) -> Self {
        Self::Engine(error.to_string())
    }
}
