//! Script Invoker - the "execute script" primitive of a remote-automation protocol
//!
//! This library dynamically constructs a callable from JavaScript source text,
//! invokes it with positionally bound arguments, and normalizes the outcome
//! (synchronous return, synchronous throw, or asynchronous settlement) into a
//! single deferred result.

pub mod config;
pub mod error;
pub mod invoker;
pub mod logging;
pub mod marshal;

pub use config::InvokerConfig;
pub use error::{InvokeError, Result};
pub use invoker::{invoke_once, ScriptInvoker};
