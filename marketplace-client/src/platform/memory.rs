// marketplace-client/src/platform/memory.rs
use super::{
    DisplayEnvironment, KeyValueStorage, Listener, ListenerHandle, ListenerRegistry, Location,
    VisualRoot,
};
use common::StorageError;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Volatile storage, used for session-scoped entries and in tests
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: DashMap<String, String>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

const PREFERENCE_UNKNOWN: u8 = 0;
const PREFERENCE_LIGHT: u8 = 1;
const PREFERENCE_DARK: u8 = 2;

/// In-process stand-in for a browser window: size, colour preference,
/// document root classes and location.
pub struct HeadlessWindow {
    width: AtomicU32,
    height: AtomicU32,
    os_preference: AtomicU8,
    href: RwLock<String>,
    history_replacements: AtomicUsize,
    classes: DashSet<String>,
    chrome_color: RwLock<Option<String>>,
    resize_listeners: ListenerRegistry<(u32, u32)>,
    scheme_listeners: ListenerRegistry<bool>,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: AtomicU32::new(width),
            height: AtomicU32::new(height),
            os_preference: AtomicU8::new(PREFERENCE_UNKNOWN),
            href: RwLock::new("http://localhost/".to_string()),
            history_replacements: AtomicUsize::new(0),
            classes: DashSet::new(),
            chrome_color: RwLock::new(None),
            resize_listeners: ListenerRegistry::new(),
            scheme_listeners: ListenerRegistry::new(),
        }
    }

    pub fn with_url(self, url: &str) -> Self {
        *self.href.write().unwrap_or_else(PoisonError::into_inner) = url.to_string();
        self
    }

    pub fn with_os_preference(self, prefers_dark: bool) -> Self {
        self.os_preference.store(encode_preference(prefers_dark), Ordering::SeqCst);
        self
    }

    /// Change the window size and fire resize listeners
    pub fn resize(&self, width: u32, height: u32) {
        self.width.store(width, Ordering::SeqCst);
        self.height.store(height, Ordering::SeqCst);
        self.resize_listeners.emit((width, height));
    }

    /// Change the OS colour preference and fire change listeners
    pub fn set_os_preference(&self, prefers_dark: bool) {
        self.os_preference.store(encode_preference(prefers_dark), Ordering::SeqCst);
        self.scheme_listeners.emit(prefers_dark);
    }

    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.classes.iter().map(|c| c.key().clone()).collect();
        classes.sort();
        classes
    }

    pub fn chrome_color(&self) -> Option<String> {
        self.chrome_color
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn history_replacements(&self) -> usize {
        self.history_replacements.load(Ordering::SeqCst)
    }

    pub fn resize_listener_count(&self) -> usize {
        self.resize_listeners.len()
    }

    pub fn scheme_listener_count(&self) -> usize {
        self.scheme_listeners.len()
    }
}

fn encode_preference(prefers_dark: bool) -> u8 {
    if prefers_dark {
        PREFERENCE_DARK
    } else {
        PREFERENCE_LIGHT
    }
}

impl DisplayEnvironment for HeadlessWindow {
    fn inner_size(&self) -> (u32, u32) {
        (
            self.width.load(Ordering::SeqCst),
            self.height.load(Ordering::SeqCst),
        )
    }

    fn prefers_dark(&self) -> Option<bool> {
        match self.os_preference.load(Ordering::SeqCst) {
            PREFERENCE_DARK => Some(true),
            PREFERENCE_LIGHT => Some(false),
            _ => None,
        }
    }

    fn on_resize(&self, listener: Listener<(u32, u32)>) -> ListenerHandle {
        self.resize_listeners.add(listener)
    }

    fn on_color_scheme_change(&self, listener: Listener<bool>) -> ListenerHandle {
        self.scheme_listeners.add(listener)
    }
}

impl VisualRoot for HeadlessWindow {
    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn add_class(&self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.remove(class);
    }

    fn set_chrome_color(&self, color: &str) {
        *self.chrome_color.write().unwrap_or_else(PoisonError::into_inner) = Some(color.to_string());
    }
}

impl Location for HeadlessWindow {
    fn href(&self) -> String {
        self.href.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn replace_state(&self, url: &str) {
        *self.href.write().unwrap_or_else(PoisonError::into_inner) = url.to_string();
        self.history_replacements.fetch_add(1, Ordering::SeqCst);
    }
}
