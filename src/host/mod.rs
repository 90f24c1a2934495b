//! Contracts for the collaborators the engine consumes but does not own:
//! the command-sender model, the deferred-task scheduler, the script
//! compiler, the startup package scanner, and static configuration.

pub mod caller;
pub mod config;
pub mod scheduler;
pub mod script;

pub use caller::{sender_key, BlockPos, Caller, CallerService, CommandSender, SenderKey};
pub use config::{class_short_name, HostConfig, ImportSpec};
pub use scheduler::{Scheduler, Task, TaskHandle};
pub use script::{ClassScanner, CompiledScript, ScriptCompiler};
