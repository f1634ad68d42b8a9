//! Frontend Models
//!
//! Data structures shared by the sync controller and the page adapters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of portfolio entry a list holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Career,
    Education,
    Certification,
    /// Project detail (image + description)
    Detail,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Career => "career",
            EntryKind::Education => "education",
            EntryKind::Certification => "certification",
            EntryKind::Detail => "detail",
        }
    }

    /// Default list container rendering this kind
    pub fn list_id(&self) -> ListId {
        ListId::new(format!("{}-list", self.as_str()))
    }

    /// Path segment of the server's delete route
    pub fn delete_segment(&self) -> &'static str {
        match self {
            EntryKind::Detail => "project/detail",
            other => other.as_str(),
        }
    }

    /// Form field names with their card labels, in render order
    pub fn field_labels(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntryKind::Career => &[
                ("company", "Company"),
                ("position", "Position"),
                ("period", "Period"),
                ("description", "Responsibilities"),
            ],
            EntryKind::Education => &[
                ("institution", "Institution"),
                ("course", "Course"),
                ("period", "Period"),
                ("description", "Details"),
            ],
            EntryKind::Certification => &[
                ("name", "Certification"),
                ("issuer", "Issuer"),
                ("acquisitionDate", "Acquired"),
            ],
            EntryKind::Detail => &[("description", "Description")],
        }
    }
}

/// What an enhanced form does, taken from its `data-ajax-form` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CareerCreate,
    EducationCreate,
    CertificationCreate,
    DetailCreate,
    /// Saves profile fields; never touches a list
    ProfileUpdate,
}

impl ActionKind {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "career" => Some(ActionKind::CareerCreate),
            "education" => Some(ActionKind::EducationCreate),
            "certification" => Some(ActionKind::CertificationCreate),
            "detail" => Some(ActionKind::DetailCreate),
            "update" => Some(ActionKind::ProfileUpdate),
            _ => None,
        }
    }

    /// Entry kind created by this action (None for updates)
    pub fn entry_kind(&self) -> Option<EntryKind> {
        match self {
            ActionKind::CareerCreate => Some(EntryKind::Career),
            ActionKind::EducationCreate => Some(EntryKind::Education),
            ActionKind::CertificationCreate => Some(EntryKind::Certification),
            ActionKind::DetailCreate => Some(EntryKind::Detail),
            ActionKind::ProfileUpdate => None,
        }
    }
}

/// Id of a list container element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListId(String);

impl ListId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-side handle of a rendered item card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey(pub u64);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the server knows about an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Appended during this page lifetime, no server identifier
    SessionLocal,
    /// Known to the server, deleted through `delete_url`
    Persisted { delete_url: String },
}

/// Reference to a rendered item, as resolved from a delete gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub list: ListId,
    pub key: ItemKey,
    pub origin: ItemOrigin,
    /// Short description quoted in the confirm prompt
    pub label: Option<String>,
}

impl ItemRef {
    pub fn is_session_local(&self) -> bool {
        self.origin == ItemOrigin::SessionLocal
    }
}

/// One entry of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    pub key: ItemKey,
    pub kind: EntryKind,
    /// Text fields as read from the submitted form
    pub fields: Vec<(String, String)>,
    pub origin: ItemOrigin,
}

impl CollectionItem {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn item_ref(&self, list: &ListId) -> ItemRef {
        ItemRef {
            list: list.clone(),
            key: self.key,
            origin: self.origin.clone(),
            label: self
                .field("description")
                .filter(|d| !d.trim().is_empty())
                .map(str::to_string),
        }
    }
}

/// Input control type, as far as validation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    TextArea,
    Url,
    File,
    Other,
}

impl InputType {
    /// Map a tag name and `type` attribute onto an input type
    pub fn from_element(tag: &str, type_attr: &str) -> Self {
        match (tag.to_ascii_lowercase().as_str(), type_attr.to_ascii_lowercase().as_str()) {
            ("textarea", _) => InputType::TextArea,
            ("input", "url") => InputType::Url,
            ("input", "file") => InputType::File,
            ("input", "text" | "" | "date" | "email" | "month") => InputType::Text,
            _ => InputType::Other,
        }
    }
}

/// Metadata of a selected file
#[derive(Debug, Clone, PartialEq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime: String,
    /// Browser file handle, absent outside the browser
    pub handle: Option<web_sys::File>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Files(Vec<FileMeta>),
}

/// A named form control with the constraints declared in markup
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInput {
    pub name: String,
    pub value: FieldValue,
    pub required: bool,
    pub max_length: Option<usize>,
    pub input_type: InputType,
}

impl FieldInput {
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            FieldValue::Files(_) => None,
        }
    }
}

/// Text fields of a form, in document order
pub fn text_fields(inputs: &[FieldInput]) -> Vec<(String, String)> {
    inputs
        .iter()
        .filter_map(|input| input.text_value().map(|v| (input.name.clone(), v.to_string())))
        .collect()
}

/// A user gesture turned into at most one server request
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Create {
        kind: ActionKind,
        fields: Vec<(String, String)>,
        target: Option<ListId>,
    },
    Delete {
        item: ItemRef,
        target: ListId,
    },
}

impl PendingAction {
    pub fn target(&self) -> Option<&ListId> {
        match self {
            PendingAction::Create { target, .. } => target.as_ref(),
            PendingAction::Delete { target, .. } => Some(target),
        }
    }
}

/// Ordered items rendered in one list container
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    items: Vec<CollectionItem>,
}

impl ViewState {
    pub fn new(confirmed: Vec<CollectionItem>) -> Self {
        Self { items: confirmed }
    }

    pub fn items(&self) -> &[CollectionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, key: ItemKey) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    pub fn append(&mut self, item: CollectionItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, key: ItemKey) -> Option<CollectionItem> {
        let index = self.items.iter().position(|item| item.key == key)?;
        Some(self.items.remove(index))
    }

    /// Items appended this session that the server never acknowledged by id
    pub fn unconfirmed(&self) -> impl Iterator<Item = &CollectionItem> {
        self.items
            .iter()
            .filter(|item| item.origin == ItemOrigin::SessionLocal)
    }

    /// Persisted items, in render order, equal `confirmed`
    pub fn reconciles_with(&self, confirmed: &[ItemKey]) -> bool {
        let persisted: Vec<ItemKey> = self
            .items
            .iter()
            .filter(|item| item.origin != ItemOrigin::SessionLocal)
            .map(|item| item.key)
            .collect();
        persisted == confirmed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

impl NotificationLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Info => "info",
        }
    }
}

/// Transient page-level message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: u64, origin: ItemOrigin) -> CollectionItem {
        CollectionItem {
            key: ItemKey(key),
            kind: EntryKind::Career,
            fields: vec![("company".to_string(), format!("Company {}", key))],
            origin,
        }
    }

    fn persisted(key: u64) -> CollectionItem {
        item(key, ItemOrigin::Persisted { delete_url: format!("/admin/career/delete/{}", key) })
    }

    #[test]
    fn test_action_kind_from_attr() {
        assert_eq!(ActionKind::from_attr("career"), Some(ActionKind::CareerCreate));
        assert_eq!(ActionKind::from_attr(" detail "), Some(ActionKind::DetailCreate));
        assert_eq!(ActionKind::from_attr("update"), Some(ActionKind::ProfileUpdate));
        assert_eq!(ActionKind::from_attr("/admin/career/add"), None);
        assert_eq!(ActionKind::ProfileUpdate.entry_kind(), None);
    }

    #[test]
    fn test_entry_kind_routes() {
        assert_eq!(EntryKind::Education.list_id().as_str(), "education-list");
        assert_eq!(EntryKind::Detail.delete_segment(), "project/detail");
        assert_eq!(EntryKind::Certification.delete_segment(), "certification");
    }

    #[test]
    fn test_input_type_from_element() {
        assert_eq!(InputType::from_element("TEXTAREA", ""), InputType::TextArea);
        assert_eq!(InputType::from_element("input", "URL"), InputType::Url);
        assert_eq!(InputType::from_element("input", "file"), InputType::File);
        assert_eq!(InputType::from_element("input", "hidden"), InputType::Other);
    }

    #[test]
    fn test_view_state_reconciles() {
        let mut view = ViewState::new(vec![persisted(1), persisted(2)]);
        view.append(item(3, ItemOrigin::SessionLocal));

        assert!(view.reconciles_with(&[ItemKey(1), ItemKey(2)]));
        assert_eq!(view.unconfirmed().count(), 1);

        let removed = view.remove(ItemKey(1)).expect("item 1 present");
        assert_eq!(removed.key, ItemKey(1));
        assert!(!view.reconciles_with(&[ItemKey(1), ItemKey(2)]));
        assert!(view.reconciles_with(&[ItemKey(2)]));
        assert!(view.remove(ItemKey(42)).is_none());
    }

    #[test]
    fn test_item_ref_label_from_description() {
        let mut entry = persisted(7);
        entry.fields.push(("description".to_string(), "Led the platform team".to_string()));
        let list = ListId::new("career-list");
        let r = entry.item_ref(&list);
        assert_eq!(r.label.as_deref(), Some("Led the platform team"));
        assert!(!r.is_session_local());
    }
}
