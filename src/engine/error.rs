use std::path::PathBuf;

use thiserror::Error;

use crate::engine::value::Value;

/// Failures surfaced by the resolution engine and the workspace registry.
///
/// Misses at a single resolution layer are control flow, not errors; only
/// exhaustion of every layer produces `PropertyNotFound` / `MethodNotFound`.
/// The remaining variants are fail-fast conditions raised on misuse of the
/// API or by collaborator code.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no such property: {0}")]
    PropertyNotFound(String),

    #[error("no such method: {receiver}.{name}({args})")]
    MethodNotFound {
        receiver: String,
        name: String,
        args: String,
    },

    #[error("invocation scope has already been initialized")]
    AlreadyInitialized,

    #[error("workspace '{0}' is not marked removed")]
    WorkspaceNotRemoved(String),

    #[error("workspace '{0}' is not registered")]
    WorkspaceNotRegistered(String),

    #[error("script file not found: {}", .0.display())]
    ScriptFileNotFound(PathBuf),

    #[error("compile error: {0}")]
    Compile(String),

    #[error("script error: {0}")]
    Script(String),
}

impl EngineError {
    /// Build a `MethodNotFound` naming the receiver, the method and the
    /// shape of the argument list.
    pub fn missing_method(receiver: impl Into<String>, name: impl Into<String>, args: &[Value]) -> Self {
        let args = args
            .iter()
            .map(|v| v.type_name())
            .collect::<Vec<_>>()
            .join(", ");
        EngineError::MethodNotFound {
            receiver: receiver.into(),
            name: name.into(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_method_names_argument_shape() {
        let err = EngineError::missing_method("me@main", "frob", &[Value::Int(1), Value::Str("x".into())]);
        assert_eq!(err.to_string(), "no such method: me@main.frob(int, string)");
    }
}
