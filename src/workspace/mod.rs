//! Workspaces, invocation scopes and the process-wide registry.
//!
//! An [`InvocationScope`] lives for one script run; a [`Workspace`] is a
//! named scope shared by every run against it; the [`WorkspaceService`] owns
//! all workspaces plus the globals, the plugin chain and the compiled-artifact
//! cache.

pub mod cache;
pub mod invocation;
pub mod service;
pub mod workspace;

pub use cache::{CompiledCache, SourceStamp};
pub use invocation::InvocationScope;
pub use service::WorkspaceService;
pub use workspace::Workspace;
