use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::trace;

use crate::host::script::CompiledScript;

/// Identity of one source file at one point in time. Key equality requires
/// both the path and the modification timestamp, so touching a file makes
/// every prior entry for it unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceStamp {
    path: PathBuf,
    modified: SystemTime,
}

impl SourceStamp {
    pub fn new(path: PathBuf, modified: SystemTime) -> Self {
        SourceStamp { path, modified }
    }

    /// Stamp a file as it currently exists on disk.
    pub fn of(path: &Path) -> io::Result<Self> {
        let modified = path.metadata()?.modified()?;
        Ok(SourceStamp::new(path.to_path_buf(), modified))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }
}

/// Cache of compiled units keyed by source stamp.
///
/// Entries hold the unit weakly: once no workspace or invocation keeps a
/// strong reference, the unit is reclaimed and the entry is dropped by the
/// next sweep. Callers must not rely on an entry outliving their own
/// reference to the unit. Stale stamps are never evicted by key; they die
/// in the same sweeps.
pub struct CompiledCache {
    entries: Mutex<HashMap<SourceStamp, Weak<dyn CompiledScript>>>,
}

impl CompiledCache {
    pub fn new() -> Self {
        CompiledCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, stamp: &SourceStamp) -> Option<Arc<dyn CompiledScript>> {
        let mut entries = self.entries.lock();
        match entries.get(stamp).and_then(Weak::upgrade) {
            Some(unit) => {
                trace!(path = %stamp.path().display(), "compiled cache hit");
                Some(unit)
            }
            None => {
                entries.remove(stamp);
                None
            }
        }
    }

    pub fn put(&self, stamp: SourceStamp, unit: &Arc<dyn CompiledScript>) {
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.strong_count() > 0);
        entries.insert(stamp, Arc::downgrade(unit));
    }

    /// Number of entries whose unit is still alive.
    pub fn live_len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }
}

impl Default for CompiledCache {
    fn default() -> Self {
        Self::new()
    }
}
