//! Page Wiring
//!
//! Delegated document listeners that route submits, delete clicks, edits
//! and focus loss into the sync controller.

use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlAnchorElement, HtmlFormElement};

use super::form::DomForm;
use super::list::{DESCRIPTION_ATTR, ITEM_KEY_ATTR, SESSION_DELETE_ATTR, UNLISTED};
use super::WindowViewport;
use crate::models::{ItemKey, ItemOrigin, ItemRef, ListId};
use crate::navigation::NavigationContext;
use crate::sync::{FormView, SyncController, Viewport};

/// Bind the page once: restore a saved scroll offset and start listening
pub fn install(controller: SyncController, nav: NavigationContext) {
    let Some(doc) = super::document() else {
        log::error!("[DOM] no document, page left unenhanced");
        return;
    };

    if let Some(offset) = nav.take_saved_offset() {
        log::debug!("[DOM] restoring scroll offset {}", offset);
        WindowViewport::new(controller.config().timing.scroll_restore_ms).restore_scroll(offset);
    }

    let on_unload = {
        let nav = nav.clone();
        Closure::<dyn FnMut(Event)>::new(move |_ev: Event| nav.save_offset(current_offset()))
    };
    if let Some(win) = web_sys::window() {
        if win
            .add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("[DOM] could not bind beforeunload listener");
        }
    }
    on_unload.forget();

    let on_submit = {
        let controller = controller.clone();
        Closure::<dyn FnMut(Event)>::new(move |ev: Event| handle_submit(&controller, &nav, ev))
    };
    let on_click = {
        let controller = controller.clone();
        Closure::<dyn FnMut(Event)>::new(move |ev: Event| handle_click(&controller, ev))
    };
    let on_input = {
        let controller = controller.clone();
        Closure::<dyn FnMut(Event)>::new(move |ev: Event| handle_input(&controller, ev))
    };
    let on_focusout = Closure::<dyn FnMut(Event)>::new(move |ev: Event| handle_focusout(&controller, ev));

    for (name, listener) in [
        ("submit", &on_submit),
        ("click", &on_click),
        ("input", &on_input),
        ("focusout", &on_focusout),
    ] {
        if doc
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("[DOM] could not bind {} listener", name);
        }
    }
    on_submit.forget();
    on_click.forget();
    on_input.forget();
    on_focusout.forget();

    log::info!("[APP] admin page enhanced");
}

// ========================
// Handlers
// ========================

fn handle_submit(controller: &SyncController, nav: &NavigationContext, ev: Event) {
    let Some(element) = ev.target().and_then(|t| t.dyn_into::<HtmlFormElement>().ok()) else {
        return;
    };
    let config = controller.shared_config();
    let form = DomForm::new(element, config);

    if form.action_kind().is_some() {
        ev.prevent_default();
        let controller = controller.clone();
        spawn_local(async move {
            if let Err(err) = controller.submit_create(&form).await {
                log::debug!("[DOM] submit ended: {}", err);
            }
        });
        return;
    }

    if form.is_enhanced() {
        // Unknown marker value: leave the form to the browser
        log::warn!("[DOM] enhanced form without a known action, submitting natively");
    }
    if controller.validate_plain_form(&form) {
        nav.save_offset(current_offset());
    } else {
        ev.prevent_default();
    }
}

fn handle_click(controller: &SyncController, ev: Event) {
    let Some(link) = ev
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("a").ok().flatten())
    else {
        return;
    };
    let session_local = link.has_attribute(SESSION_DELETE_ATTR);
    let href = link.get_attribute("href").unwrap_or_default();
    if !session_local && !href.contains("/delete/") {
        return;
    }
    ev.prevent_default();

    let Some(item) = resolve_item(controller, &link, session_local) else {
        log::warn!("[DOM] delete link outside an item card ignored");
        return;
    };
    let controller = controller.clone();
    spawn_local(async move {
        if let Err(err) = controller.submit_delete(&item).await {
            log::debug!("[DOM] delete ended: {}", err);
        }
    });
}

fn handle_input(controller: &SyncController, ev: Event) {
    if let Some((form, name)) = edited_field(controller, &ev) {
        controller.revalidate_if_marked(&form, &name);
    }
}

fn handle_focusout(controller: &SyncController, ev: Event) {
    if let Some((form, name)) = edited_field(controller, &ev) {
        controller.revalidate_field(&form, &name);
    }
}

/// Named form control an event came from, with its form
fn edited_field(controller: &SyncController, ev: &Event) -> Option<(DomForm, String)> {
    let control = ev.target()?.dyn_into::<Element>().ok()?;
    if !matches!(control.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT") {
        return None;
    }
    let name = control.get_attribute("name").filter(|n| !n.is_empty())?;
    let form = DomForm::enclosing(&control, controller.shared_config())?;
    Some((form, name))
}

fn current_offset() -> f64 {
    web_sys::window()
        .and_then(|win| win.scroll_y().ok())
        .unwrap_or(0.0)
}

// ========================
// Delete targets
// ========================

/// Build an `ItemRef` for the card holding `link`, keying the card on first use
fn resolve_item(controller: &SyncController, link: &Element, session_local: bool) -> Option<ItemRef> {
    let card = link.closest(".item-card").ok()??;
    let list = list_of(&card);

    let key = match card
        .get_attribute(ITEM_KEY_ATTR)
        .and_then(|raw| raw.parse::<u64>().ok())
    {
        Some(raw) => ItemKey(raw),
        None => {
            let key = controller.next_item_key();
            let _ = card.set_attribute(ITEM_KEY_ATTR, &key.to_string());
            key
        }
    };

    let origin = if session_local {
        ItemOrigin::SessionLocal
    } else {
        let delete_url = link
            .dyn_ref::<HtmlAnchorElement>()
            .map(|a| a.href())
            .or_else(|| link.get_attribute("href"))?;
        ItemOrigin::Persisted { delete_url }
    };

    let label = link
        .get_attribute(DESCRIPTION_ATTR)
        .or_else(|| card.get_attribute(DESCRIPTION_ATTR))
        .filter(|label| !label.trim().is_empty());

    Some(ItemRef { list, key, origin, label })
}

/// Id of the list container a card lives in
fn list_of(card: &Element) -> ListId {
    let parent = card.parent_element().map(|parent| parent.id());
    let nearest = card
        .closest("[id$='-list']")
        .ok()
        .flatten()
        .map(|list| list.id());
    container_list(parent, nearest)
}

/// Cards outside any identified container share `UNLISTED`
fn container_list(parent_id: Option<String>, nearest_list_id: Option<String>) -> ListId {
    parent_id
        .into_iter()
        .chain(nearest_list_id)
        .map(|id| id.trim().to_string())
        .find(|id| !id.is_empty())
        .map(ListId::new)
        .unwrap_or_else(|| ListId::new(UNLISTED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_list_prefers_parent_id() {
        assert_eq!(
            container_list(Some("career-list".to_string()), Some("education-list".to_string())),
            ListId::new("career-list")
        );
        assert_eq!(
            container_list(Some(String::new()), Some("education-list".to_string())),
            ListId::new("education-list")
        );
    }

    #[test]
    fn test_card_without_container_id_still_resolves() {
        assert_eq!(container_list(Some(" ".to_string()), None), ListId::new(UNLISTED));
        assert_eq!(container_list(None, None), ListId::new(UNLISTED));
    }
}
