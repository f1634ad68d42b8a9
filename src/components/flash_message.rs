//! Flash Message Component
//!
//! The page-wide notification. One at a time; closes on its button, on
//! Escape, or when the notifier's timer runs out.

use leptos::prelude::*;

use crate::store::{store_dismiss_flash, use_app_store, AppStateStoreFields};

#[component]
pub fn FlashMessage() -> impl IntoView {
    let store = use_app_store();

    let _ = window_event_listener(leptos::ev::keydown, move |ev| {
        if ev.key() == "Escape" && store.flash().get_untracked().notification.is_some() {
            store_dismiss_flash(&store);
        }
    });

    view! {
        {move || store.flash().get().notification.map(|n| view! {
            <div class=format!("flash-message {}", n.level.css_class()) role="alert">
                <span class="flash-message-text">{n.message}</span>
                <button
                    class="flash-message-close"
                    aria-label="Close"
                    on:click=move |_| store_dismiss_flash(&store)
                >
                    "×"
                </button>
            </div>
        })}
    }
}
