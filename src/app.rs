//! Portfolio Admin App
//!
//! Wires the sync controller to the server-rendered admin page and mounts
//! the flash notification.

use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::commands::FetchTransport;
use crate::components::FlashMessage;
use crate::config::SyncConfig;
use crate::dom::{self, BrowserConfirm, BrowserSessionStore, DomLists, WindowViewport};
use crate::navigation::NavigationContext;
use crate::store::{AppState, StoreNotifier};
use crate::sync::{Ports, SyncController};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);

    let config = Rc::new(SyncConfig::load());
    let ports = Ports {
        transport: Rc::new(FetchTransport),
        lists: Rc::new(DomLists::new(config.clone())),
        notifier: Rc::new(StoreNotifier::new(store, config.timing.notification_ms)),
        confirmer: Rc::new(BrowserConfirm),
        viewport: Rc::new(WindowViewport::new(config.timing.scroll_restore_ms)),
    };
    let nav = NavigationContext::new(BrowserSessionStore::open(), config.scroll_storage_key.clone());
    let controller = SyncController::new(ports, config);

    dom::install(controller, nav);

    view! { <FlashMessage /> }
}
