//! Pluggable resolver chain.
//!
//! The chain extends name resolution beyond the fixed scope layers: when a
//! property read has exhausted the invocation, workspace and global bindings,
//! and when a method invocation has found no intrinsic or locally bound
//! callable, the registered plugins are consulted in registration order.
//!
//! A plugin either answers or *declines*; declining is a control signal, not
//! a failure, and hands the request to the next plugin in the chain.

pub mod chain;
pub mod resolver;

pub use chain::PluginChain;
pub use resolver::PluginResolver;
