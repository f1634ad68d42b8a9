//! Controller Ports
//!
//! What the sync controller needs from the page. The browser adapters live
//! in `crate::dom`; tests use in-memory versions.

use std::rc::Rc;

use crate::commands::ServerTransport;
use crate::models::{ActionKind, CollectionItem, FieldInput, ItemRef, ListId, Notification};

/// A form as the controller sees it
pub trait FormView {
    /// `None` for plain forms without `data-ajax-form`
    fn action_kind(&self) -> Option<ActionKind>;
    fn action_url(&self) -> String;
    /// Explicit `data-target-list` override
    fn target_list(&self) -> Option<ListId>;
    fn inputs(&self) -> Vec<FieldInput>;
    fn mark_invalid(&self, field: &str, message: &str);
    fn clear_invalid(&self, field: &str);
    /// Whether `field` currently shows an inline error
    fn is_invalid(&self, field: &str) -> bool;
    fn reset(&self);
    fn set_loading(&self, loading: bool);
}

/// List containers on the page
pub trait ListView {
    /// Render `item` at the end of `list`; false when the container is missing
    fn append(&self, list: &ListId, item: &CollectionItem) -> bool;
    /// Remove exactly the referenced item; false when it is not rendered
    fn remove(&self, item: &ItemRef) -> bool;
    fn set_item_loading(&self, item: &ItemRef, loading: bool);
}

pub trait Notifier {
    /// Replaces whatever notification is showing
    fn notify(&self, notification: Notification);
}

/// Blocking yes/no prompt
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

pub trait Viewport {
    fn scroll_offset(&self) -> f64;
    /// Scroll back to `offset` once the layout has settled
    fn restore_scroll(&self, offset: f64);
}

#[derive(Clone)]
pub struct Ports {
    pub transport: Rc<dyn ServerTransport>,
    pub lists: Rc<dyn ListView>,
    pub notifier: Rc<dyn Notifier>,
    pub confirmer: Rc<dyn Confirmer>,
    pub viewport: Rc<dyn Viewport>,
}
