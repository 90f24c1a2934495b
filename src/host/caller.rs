use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::engine::value::Value;

/// A block-like position, used as a stable identity fallback for senders
/// that have no persistent unique id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// A command-issuing identity from the host environment.
///
/// Message delivery is fire-and-forget; the engine never waits on it.
pub trait CommandSender: Send + Sync {
    /// Display name, always available.
    fn name(&self) -> &str;

    /// Unique persistent id, if the host has one for this sender.
    fn unique_id(&self) -> Option<Uuid> {
        None
    }

    /// Location-like fallback identity for block-bound senders.
    fn block_pos(&self) -> Option<BlockPos> {
        None
    }

    fn send_message(&self, text: &str);
}

/// Stable identity key for a sender.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SenderKey {
    Id(Uuid),
    Block(BlockPos),
    Name(String),
}

/// Derive the most specific stable identity available: unique id, else the
/// block position, else the display name.
pub fn sender_key(sender: &dyn CommandSender) -> SenderKey {
    if let Some(id) = sender.unique_id() {
        return SenderKey::Id(id);
    }
    if let Some(pos) = sender.block_pos() {
        return SenderKey::Block(pos);
    }
    SenderKey::Name(sender.name().to_string())
}

/// A sender plus the per-sender script state the engine tracks for it:
/// the result of the last evaluation, readable from scripts as `_`.
pub struct Caller {
    sender: Arc<dyn CommandSender>,
    last_result: Mutex<Value>,
}

impl Caller {
    pub fn new(sender: Arc<dyn CommandSender>) -> Self {
        Caller {
            sender,
            last_result: Mutex::new(Value::Null),
        }
    }

    pub fn sender(&self) -> &Arc<dyn CommandSender> {
        &self.sender
    }

    pub fn last_result(&self) -> Value {
        self.last_result.lock().clone()
    }

    pub fn set_last_result(&self, value: Value) {
        *self.last_result.lock() = value;
    }

    /// Deliver one message tagged with its origin workspace.
    pub fn deliver(&self, text: &str, workspace: &str) {
        self.sender.send_message(&format!("[{}] {}", workspace, text));
    }
}

/// Process-wide interning of callers, one per stable sender identity, plus
/// the console caller used for autorun output.
pub struct CallerService {
    callers: Mutex<HashMap<SenderKey, Arc<Caller>>>,
    console: Arc<Caller>,
}

impl CallerService {
    pub fn new(console_sender: Arc<dyn CommandSender>) -> Self {
        CallerService {
            callers: Mutex::new(HashMap::new()),
            console: Arc::new(Caller::new(console_sender)),
        }
    }

    /// The caller for `sender`, created on first access.
    pub fn caller(&self, sender: &Arc<dyn CommandSender>) -> Arc<Caller> {
        let key = sender_key(sender.as_ref());
        self.callers
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(Caller::new(sender.clone())))
            .clone()
    }

    pub fn console_caller(&self) -> Arc<Caller> {
        self.console.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSender {
        name: String,
        id: Option<Uuid>,
        pos: Option<BlockPos>,
    }

    impl CommandSender for FakeSender {
        fn name(&self) -> &str {
            &self.name
        }
        fn unique_id(&self) -> Option<Uuid> {
            self.id
        }
        fn block_pos(&self) -> Option<BlockPos> {
            self.pos
        }
        fn send_message(&self, _text: &str) {}
    }

    #[test]
    fn test_sender_key_prefers_unique_id() {
        let id = Uuid::new_v4();
        let sender = FakeSender {
            name: "steve".to_string(),
            id: Some(id),
            pos: Some(BlockPos { x: 1, y: 2, z: 3 }),
        };
        assert_eq!(sender_key(&sender), SenderKey::Id(id));
    }

    #[test]
    fn test_sender_key_falls_back_to_block_then_name() {
        let block = FakeSender {
            name: "cmd".to_string(),
            id: None,
            pos: Some(BlockPos { x: 0, y: 64, z: 0 }),
        };
        assert_eq!(sender_key(&block), SenderKey::Block(BlockPos { x: 0, y: 64, z: 0 }));

        let console = FakeSender {
            name: "console".to_string(),
            id: None,
            pos: None,
        };
        assert_eq!(sender_key(&console), SenderKey::Name("console".to_string()));
    }

    #[test]
    fn test_caller_service_interns_by_identity() {
        let service = CallerService::new(Arc::new(FakeSender {
            name: "console".to_string(),
            id: None,
            pos: None,
        }));
        let id = Uuid::new_v4();
        let a: Arc<dyn CommandSender> = Arc::new(FakeSender {
            name: "steve".to_string(),
            id: Some(id),
            pos: None,
        });
        let b: Arc<dyn CommandSender> = Arc::new(FakeSender {
            name: "renamed".to_string(),
            id: Some(id),
            pos: None,
        });
        let first = service.caller(&a);
        let second = service.caller(&b);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
