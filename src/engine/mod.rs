//! Layered dynamic-resolution engine.
//!
//! Script code resolves names against an ordered chain of scopes:
//!
//! ```text
//! Property read / method invocation (first match wins):
//! 1. Invocation scope (intrinsics, then local bindings)
//! 2. Workspace (intrinsics, then shared bindings)
//! 3. Service globals
//! 4. Plugin chain (registration order, decline passes the request on)
//! ```
//!
//! Property writes are different: every layer's intrinsic setter is attempted
//! unconditionally and the value always lands in the workspace bindings.

pub mod error;
pub mod plugin;
pub mod resolve;
pub mod scope;
pub mod value;

pub use error::EngineError;
pub use plugin::{PluginChain, PluginResolver};
pub use scope::DynamicScope;
pub use value::{Callable, NativeFn, Value};
