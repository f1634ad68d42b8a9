//! Navigation Context
//!
//! Scroll offset carried across a full page reload (plain form posts and
//! redirects) through session storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key/value storage that survives a reload of the same tab
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store, used when `sessionStorage` is unavailable
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[derive(Clone)]
pub struct NavigationContext {
    store: Rc<dyn SessionStore>,
    key: String,
}

impl NavigationContext {
    pub fn new(store: Rc<dyn SessionStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn save_offset(&self, offset: f64) {
        self.store.set(&self.key, &offset.to_string());
    }

    /// Saved offset, cleared on read so it applies to one load only
    pub fn take_saved_offset(&self) -> Option<f64> {
        let raw = self.store.get(&self.key)?;
        self.store.remove(&self.key);
        match raw.trim().parse::<f64>() {
            Ok(offset) if offset.is_finite() => Some(offset),
            _ => {
                log::warn!("[APP] ignoring saved scroll offset {:?}", raw);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_taken_once() {
        let store = Rc::new(MemorySessionStore::default());
        let nav = NavigationContext::new(store.clone(), "adminScrollPosition");

        assert_eq!(nav.take_saved_offset(), None);
        nav.save_offset(1280.0);
        assert_eq!(store.get("adminScrollPosition").as_deref(), Some("1280"));
        assert_eq!(nav.take_saved_offset(), Some(1280.0));
        assert_eq!(nav.take_saved_offset(), None);
    }

    #[test]
    fn test_latest_save_wins() {
        let store = Rc::new(MemorySessionStore::default());
        let nav = NavigationContext::new(store, "adminScrollPosition");

        // Form submit saves first, the unload that follows saves again
        nav.save_offset(300.0);
        nav.save_offset(320.5);
        assert_eq!(nav.take_saved_offset(), Some(320.5));
    }

    #[test]
    fn test_garbage_offset_is_dropped() {
        let store = Rc::new(MemorySessionStore::default());
        store.set("k", "top");
        let nav = NavigationContext::new(store.clone(), "k");

        assert_eq!(nav.take_saved_offset(), None);
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_contexts_use_separate_keys() {
        let store = Rc::new(MemorySessionStore::default());
        let admin = NavigationContext::new(store.clone(), "adminScrollPosition");
        let detail = NavigationContext::new(store.clone(), "projectDetailScrollPosition");

        admin.save_offset(10.5);
        assert_eq!(detail.take_saved_offset(), None);
        assert_eq!(admin.take_saved_offset(), Some(10.5));
    }
}
