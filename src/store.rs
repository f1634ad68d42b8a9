//! Global Application State Store
//!
//! Uses Leptos reactive_stores for the page-level flash notification.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Notification;
use crate::sync::Notifier;

/// The single notification slot. Every `show` bumps `seq`, so a timer
/// started for an older notification cannot dismiss a newer one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flash {
    pub notification: Option<Notification>,
    pub seq: u64,
}

impl Flash {
    pub fn show(&mut self, notification: Notification) -> u64 {
        self.seq += 1;
        self.notification = Some(notification);
        self.seq
    }

    pub fn dismiss(&mut self) {
        self.notification = None;
    }

    /// Dismiss only if `seq` is still the notification on screen
    pub fn dismiss_if_current(&mut self, seq: u64) -> bool {
        if self.seq == seq && self.notification.is_some() {
            self.notification = None;
            true
        } else {
            false
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub flash: Flash,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_show_flash(store: &AppStore, notification: Notification) -> u64 {
    store.flash().write().show(notification)
}

pub fn store_dismiss_flash(store: &AppStore) {
    store.flash().write().dismiss();
}

pub fn store_dismiss_flash_if(store: &AppStore, seq: u64) {
    store.flash().write().dismiss_if_current(seq);
}

/// `Notifier` that writes into the store and auto-dismisses
#[derive(Clone, Copy)]
pub struct StoreNotifier {
    store: AppStore,
    dismiss_after_ms: u32,
}

impl StoreNotifier {
    pub fn new(store: AppStore, dismiss_after_ms: u32) -> Self {
        Self { store, dismiss_after_ms }
    }
}

impl Notifier for StoreNotifier {
    fn notify(&self, notification: Notification) {
        let seq = store_show_flash(&self.store, notification);
        let store = self.store;
        Timeout::new(self.dismiss_after_ms, move || store_dismiss_flash_if(&store, seq)).forget();
    }
}
