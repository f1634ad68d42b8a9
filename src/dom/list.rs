//! List Adapter
//!
//! Renders and removes `.item-card` nodes inside the list containers.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::SyncConfig;
use crate::models::{CollectionItem, ItemKey, ItemOrigin, ItemRef, ListId};
use crate::sync::ListView;

/// Client-side key stamped on every card the page has touched
pub const ITEM_KEY_ATTR: &str = "data-item-key";
pub const SESSION_DELETE_ATTR: &str = "data-delete";
pub const DESCRIPTION_ATTR: &str = "data-description";
/// List id given to cards whose container has no id
pub const UNLISTED: &str = "unlisted";

const DELETE_LABEL: &str = "Delete";

pub struct DomLists {
    config: Rc<SyncConfig>,
}

impl DomLists {
    pub fn new(config: Rc<SyncConfig>) -> Self {
        Self { config }
    }

    fn card(&self, list: &ListId, key: ItemKey) -> Option<Element> {
        let doc = super::document()?;
        let selector = format!(".item-card[{}=\"{}\"]", ITEM_KEY_ATTR, key);
        // Keys are unique per page, so an unidentified container is searched document-wide
        match doc.get_element_by_id(list.as_str()) {
            Some(container) => container.query_selector(&selector).ok()?,
            None => doc.query_selector(&selector).ok()?,
        }
    }

    fn animate_in(&self, card: &Element) {
        let Some(html) = card.dyn_ref::<HtmlElement>().cloned() else { return };
        let style = html.style();
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("transform", "translateY(20px)");

        Timeout::new(self.config.timing.enter_delay_ms, move || {
            let style = html.style();
            let _ = style.set_property("transition", "all 0.3s ease");
            let _ = style.set_property("opacity", "1");
            let _ = style.set_property("transform", "translateY(0)");
        })
        .forget();
    }

    fn animate_out(&self, card: Element) {
        if let Some(html) = card.dyn_ref::<HtmlElement>() {
            let style = html.style();
            let _ = style.set_property("transition", "all 0.3s ease");
            let _ = style.set_property("opacity", "0");
            let _ = style.set_property("transform", "translateX(-100%)");
        }
        Timeout::new(self.config.timing.exit_transition_ms, move || card.remove()).forget();
    }
}

impl ListView for DomLists {
    fn append(&self, list: &ListId, item: &CollectionItem) -> bool {
        let Some(doc) = super::document() else { return false };
        let Some(container) = doc.get_element_by_id(list.as_str()) else {
            return false;
        };
        match build_card(&doc, item) {
            Ok(card) => {
                if container.append_child(&card).is_err() {
                    log::error!("[DOM] could not append card to {}", list);
                    return false;
                }
                self.animate_in(&card);
                true
            }
            Err(err) => {
                log::error!("[DOM] could not build card: {:?}", err);
                false
            }
        }
    }

    fn remove(&self, item: &ItemRef) -> bool {
        match self.card(&item.list, item.key) {
            Some(card) => {
                self.animate_out(card);
                true
            }
            None => {
                log::warn!("[DOM] card {} not found in {}", item.key, item.list);
                false
            }
        }
    }

    fn set_item_loading(&self, item: &ItemRef, loading: bool) {
        if let Some(card) = self.card(&item.list, item.key) {
            let classes = card.class_list();
            let _ = if loading { classes.add_1("loading") } else { classes.remove_1("loading") };
        }
    }
}

// ========================
// Card markup
// ========================

/// Card built with text nodes only; field values are never parsed as HTML
fn build_card(doc: &Document, item: &CollectionItem) -> Result<Element, wasm_bindgen::JsValue> {
    let card = doc.create_element("div")?;
    card.set_class_name("item-card");
    card.set_attribute(ITEM_KEY_ATTR, &item.key.to_string())?;

    let content = doc.create_element("div")?;
    content.set_class_name("item-card-content");
    for (name, label) in item.kind.field_labels() {
        let value = item.field(name).unwrap_or_default();
        if *name == "description" && value.trim().is_empty() {
            continue;
        }
        let row = doc.create_element("p")?;
        let strong = doc.create_element("strong")?;
        strong.set_text_content(Some(&format!("{}:", label)));
        row.append_child(&strong)?;
        row.append_child(&doc.create_text_node(&format!(" {}", value)))?;
        content.append_child(&row)?;
    }

    let actions = doc.create_element("div")?;
    actions.set_class_name("item-card-actions");
    let delete = doc.create_element("a")?;
    delete.set_class_name("btn btn-danger btn-sm");
    delete.set_text_content(Some(DELETE_LABEL));
    match &item.origin {
        ItemOrigin::SessionLocal => {
            delete.set_attribute("href", "#")?;
            delete.set_attribute(SESSION_DELETE_ATTR, "true")?;
        }
        ItemOrigin::Persisted { delete_url } => delete.set_attribute("href", delete_url)?,
    }
    if let Some(description) = item.field("description").filter(|d| !d.trim().is_empty()) {
        delete.set_attribute(DESCRIPTION_ATTR, description)?;
    }
    actions.append_child(&delete)?;

    card.append_child(&content)?;
    card.append_child(&actions)?;
    Ok(card)
}
