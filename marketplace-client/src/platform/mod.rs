// marketplace-client/src/platform/mod.rs
//! Host seams: storage, document root, window and location.
//!
//! The state layer never touches a browser directly. A host (a wasm shell,
//! the headless binary, tests) supplies implementations of these traits.

pub mod file_storage;
pub mod memory;

pub use file_storage::JsonFileStorage;
pub use memory::{HeadlessWindow, InMemoryStorage};

use common::StorageError;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// String key-value store with local-storage semantics
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// The visual root element (class list plus browser-chrome colour hint)
pub trait VisualRoot: Send + Sync {
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn set_chrome_color(&self, color: &str);
}

/// Window-level environment: size, OS colour preference and their change events
pub trait DisplayEnvironment: Send + Sync {
    fn inner_size(&self) -> (u32, u32);
    /// `None` when the host cannot report a preference
    fn prefers_dark(&self) -> Option<bool>;
    fn on_resize(&self, listener: Listener<(u32, u32)>) -> ListenerHandle;
    fn on_color_scheme_change(&self, listener: Listener<bool>) -> ListenerHandle;
}

/// Current document location and history
pub trait Location: Send + Sync {
    fn href(&self) -> String;
    /// Replace the visible URL without navigating
    fn replace_state(&self, url: &str);
}

pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Cleanup handle returned when registering an event listener.
/// The listener stays registered until `remove` is called.
#[must_use = "listeners leak unless the handle is removed"]
pub struct ListenerHandle {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ListenerHandle {
    pub fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { detach: Some(Box::new(detach)) }
    }

    /// Handle for a listener that was never attached
    pub fn noop() -> Self {
        Self { detach: None }
    }

    pub fn remove(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

struct RegistryInner<T> {
    next_id: AtomicU64,
    listeners: DashMap<u64, Listener<T>>,
}

/// Listener table used by host implementations to fan out events
pub struct ListenerRegistry<T> {
    inner: Arc<RegistryInner<T>>,
}

impl<T: Clone + 'static> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                next_id: AtomicU64::new(0),
                listeners: DashMap::new(),
            }),
        }
    }

    pub fn add(&self, listener: Listener<T>) -> ListenerHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.insert(id, listener);

        let registry: Weak<RegistryInner<T>> = Arc::downgrade(&self.inner);
        ListenerHandle::new(move || {
            if let Some(inner) = registry.upgrade() {
                inner.listeners.remove(&id);
            }
        })
    }

    pub fn emit(&self, value: T) {
        // Snapshot first so a listener can never run while a shard is locked
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for listener in listeners {
            listener(value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.listeners.is_empty()
    }
}

impl<T: Clone + 'static> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
