//! Context Registry
//!
//! Maps opaque handles to live contexts. Slots are reused, but every context
//! gets a fresh serial and the handle carries it, so a handle that outlived its
//! context can never resolve to whichever context later occupies the slot.

use crate::context::{Context, ContextCreateInfo};
use crate::error::{RegistryError, VsmError};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Opaque context identity handed to clients
///
/// Layout: `(serial << 32) | slot`. Serials start at 1, so no live handle is
/// ever zero; zero is reserved for [`ContextHandle::NULL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextHandle(u64);

impl ContextHandle {
    pub const NULL: ContextHandle = ContextHandle(0);

    pub const fn from_raw(raw: u64) -> Self {
        ContextHandle(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    fn new(serial: u32, slot: u32) -> Self {
        ContextHandle((u64::from(serial) << 32) | u64::from(slot))
    }

    fn serial(self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn slot(self) -> usize {
        (self.0 & u64::from(u32::MAX)) as usize
    }
}

impl fmt::Display for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

struct Slot {
    serial: u32,
    context: Option<Arc<Context>>,
}

#[derive(Default)]
struct Slots {
    entries: Vec<Slot>,
    free: Vec<u32>,
    last_serial: u32,
    live: usize,
}

impl Slots {
    fn next_serial(&mut self) -> u32 {
        // Zero is skipped on wrap so handles stay non-null.
        self.last_serial = self.last_serial.checked_add(1).unwrap_or(1);
        self.last_serial
    }

    fn insert(&mut self, context: Arc<Context>) -> ContextHandle {
        let serial = self.next_serial();
        let slot = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.serial = serial;
                entry.context = Some(context);
                slot
            }
            None => {
                self.entries.push(Slot {
                    serial,
                    context: Some(context),
                });
                (self.entries.len() - 1) as u32
            }
        };
        self.live += 1;
        ContextHandle::new(serial, slot)
    }

    fn lookup(&self, handle: ContextHandle) -> Option<&Arc<Context>> {
        self.entries
            .get(handle.slot())
            .filter(|entry| entry.serial == handle.serial())
            .and_then(|entry| entry.context.as_ref())
    }

    fn take(&mut self, handle: ContextHandle) -> Option<Arc<Context>> {
        let entry = self
            .entries
            .get_mut(handle.slot())
            .filter(|entry| entry.serial == handle.serial())?;
        let context = entry.context.take()?;
        self.free.push(handle.slot() as u32);
        self.live -= 1;
        Some(context)
    }
}

/// Registry of live contexts
///
/// All mutation goes through a single lock. Contexts are constructed outside
/// the lock, so a slow repository open never blocks other callers.
#[derive(Default)]
pub struct ContextRegistry {
    slots: Mutex<Slots>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> Arc<ContextRegistry> {
        static GLOBAL: OnceLock<Arc<ContextRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ContextRegistry::new())).clone()
    }

    /// Create a context from `info` and register it
    pub fn create(&self, info: &ContextCreateInfo) -> Result<ContextHandle, VsmError> {
        let context = Arc::new(Context::create(info)?);
        Ok(self.insert(context))
    }

    /// Register an already-built context
    pub fn insert(&self, context: Arc<Context>) -> ContextHandle {
        let handle = self.slots.lock().insert(context);
        info!(context = %handle, "Registered context");
        handle
    }

    /// Resolve a handle to its live context
    pub fn get(&self, handle: ContextHandle) -> Result<Arc<Context>, RegistryError> {
        if handle.is_null() {
            return Err(RegistryError::NullHandle);
        }
        self.slots
            .lock()
            .lookup(handle)
            .cloned()
            .ok_or(RegistryError::UnknownContext(handle))
    }

    /// Unregister and release the context behind `handle`.
    ///
    /// Unknown, stale and null handles are ignored. Returns whether a context
    /// was released.
    ///
    /// The handle stops resolving immediately. The repository connection closes
    /// once the last `Arc<Context>` obtained through [`get`](Self::get) is
    /// dropped, so an operation still in flight on another thread finishes
    /// against the open repository.
    pub fn destroy(&self, handle: ContextHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        // Drop the context after releasing the lock; closing the repository
        // may touch the filesystem.
        let released = self.slots.lock().take(handle);
        match released {
            Some(_) => {
                info!(context = %handle, "Destroyed context");
                true
            }
            None => {
                debug!(context = %handle, "Destroy ignored for unknown context");
                false
            }
        }
    }

    /// Number of live contexts
    pub fn len(&self) -> usize {
        self.slots.lock().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
