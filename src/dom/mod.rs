//! Page Adapters
//!
//! web-sys implementations of the controller ports, bound to the
//! server-rendered admin markup.

mod form;
mod list;
mod page;

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::navigation::{MemorySessionStore, SessionStore};
use crate::sync::{Confirmer, Viewport};

pub use list::DomLists;
pub use page::install;

pub(crate) fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Elements matching `selector` under `root`, in document order
pub(crate) fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        log::error!("[DOM] bad selector {}", selector);
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

// ========================
// Small ports
// ========================

/// `window.confirm`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirm;

impl Confirmer for BrowserConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|win| win.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

/// Window scroll position, restored after the layout settles
#[derive(Debug, Clone, Copy)]
pub struct WindowViewport {
    restore_delay_ms: u32,
}

impl WindowViewport {
    pub fn new(restore_delay_ms: u32) -> Self {
        Self { restore_delay_ms }
    }
}

impl Viewport for WindowViewport {
    fn scroll_offset(&self) -> f64 {
        web_sys::window()
            .and_then(|win| win.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn restore_scroll(&self, offset: f64) {
        Timeout::new(self.restore_delay_ms, move || {
            if let Some(win) = web_sys::window() {
                win.scroll_to_with_x_and_y(0.0, offset);
            }
        })
        .forget();
    }
}

/// `window.sessionStorage`
pub struct BrowserSessionStore {
    storage: web_sys::Storage,
}

impl BrowserSessionStore {
    /// Session storage when the browser allows it, memory otherwise
    pub fn open() -> Rc<dyn SessionStore> {
        match web_sys::window().and_then(|win| win.session_storage().ok().flatten()) {
            Some(storage) => Rc::new(Self { storage }),
            None => {
                log::warn!("[DOM] sessionStorage unavailable, scroll position kept in memory");
                Rc::new(MemorySessionStore::default())
            }
        }
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("[DOM] could not write {} to sessionStorage", key);
        }
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}
