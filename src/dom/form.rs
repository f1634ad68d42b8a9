//! Form Adapter
//!
//! `FormView` over a server-rendered `<form>`.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{
    Element, File, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use super::query_all;
use crate::config::SyncConfig;
use crate::models::{ActionKind, FieldInput, FieldValue, FileMeta, InputType, ListId};
use crate::sync::FormView;

pub const AJAX_FORM_ATTR: &str = "data-ajax-form";
const TARGET_LIST_ATTR: &str = "data-target-list";
const ORIGINAL_TEXT_ATTR: &str = "data-original-text";
const ERROR_FIELD_ATTR: &str = "data-error-for";
const CONTROLS: &str = "input[name], textarea[name], select[name]";

pub struct DomForm {
    element: HtmlFormElement,
    config: Rc<SyncConfig>,
}

impl DomForm {
    pub fn new(element: HtmlFormElement, config: Rc<SyncConfig>) -> Self {
        Self { element, config }
    }

    /// The form enclosing `element`, if any
    pub fn enclosing(element: &Element, config: Rc<SyncConfig>) -> Option<Self> {
        let form = element.closest("form").ok()??;
        let form = form.dyn_into::<HtmlFormElement>().ok()?;
        Some(Self::new(form, config))
    }

    pub fn is_enhanced(&self) -> bool {
        self.element.has_attribute(AJAX_FORM_ATTR)
    }

    fn control(&self, name: &str) -> Option<Element> {
        query_all(&self.element, CONTROLS)
            .into_iter()
            .find(|el| el.get_attribute("name").as_deref() == Some(name))
    }

    fn error_node(&self, name: &str) -> Option<Element> {
        query_all(&self.element, ".field-error")
            .into_iter()
            .find(|el| el.get_attribute(ERROR_FIELD_ATTR).as_deref() == Some(name))
    }

    fn submit_button(&self) -> Option<HtmlButtonElement> {
        self.element
            .query_selector("button[type=submit]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    }

    fn clear_all_invalid(&self) {
        for node in query_all(&self.element, ".field-error") {
            node.remove();
        }
        for control in query_all(&self.element, ".invalid") {
            let _ = control.class_list().remove_1("invalid");
        }
    }
}

impl FormView for DomForm {
    fn action_kind(&self) -> Option<ActionKind> {
        let attr = self.element.get_attribute(AJAX_FORM_ATTR)?;
        let kind = ActionKind::from_attr(&attr);
        if kind.is_none() {
            log::warn!("[DOM] unknown {}=\"{}\"", AJAX_FORM_ATTR, attr);
        }
        kind
    }

    fn action_url(&self) -> String {
        self.element.action()
    }

    fn target_list(&self) -> Option<ListId> {
        self.element
            .get_attribute(TARGET_LIST_ATTR)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(ListId::new)
    }

    fn inputs(&self) -> Vec<FieldInput> {
        query_all(&self.element, CONTROLS)
            .iter()
            .filter_map(read_control)
            .collect()
    }

    fn mark_invalid(&self, field: &str, message: &str) {
        let Some(control) = self.control(field) else {
            log::warn!("[DOM] no control named {} for error \"{}\"", field, message);
            return;
        };
        let _ = control.class_list().add_1("invalid");

        if let Some(node) = self.error_node(field) {
            node.set_text_content(Some(message));
            return;
        }
        let Some(doc) = super::document() else { return };
        let Ok(node) = doc.create_element("div") else { return };
        node.set_class_name("field-error");
        let _ = node.set_attribute("role", "alert");
        let _ = node.set_attribute(ERROR_FIELD_ATTR, field);
        node.set_text_content(Some(message));
        let _ = control.insert_adjacent_element("afterend", &node);
    }

    fn clear_invalid(&self, field: &str) {
        if let Some(control) = self.control(field) {
            let _ = control.class_list().remove_1("invalid");
        }
        if let Some(node) = self.error_node(field) {
            node.remove();
        }
    }

    fn is_invalid(&self, field: &str) -> bool {
        self.control(field)
            .map(|control| control.class_list().contains("invalid"))
            .unwrap_or(false)
    }

    fn reset(&self) {
        self.element.reset();
        self.clear_all_invalid();
    }

    fn set_loading(&self, loading: bool) {
        let messages = &self.config.messages;
        let classes = self.element.class_list();
        let _ = if loading { classes.add_1("loading") } else { classes.remove_1("loading") };

        let Some(button) = self.submit_button() else { return };
        button.set_disabled(loading);
        if loading {
            if !button.has_attribute(ORIGINAL_TEXT_ATTR) {
                let label = button.text_content().unwrap_or_default();
                let _ = button.set_attribute(ORIGINAL_TEXT_ATTR, label.trim());
            }
            button.set_text_content(Some(&messages.loading_label));
        } else {
            let label = button
                .get_attribute(ORIGINAL_TEXT_ATTR)
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| messages.default_submit_label.clone());
            button.set_text_content(Some(&label));
        }
    }
}

// ========================
// Control reading
// ========================

fn read_control(element: &Element) -> Option<FieldInput> {
    let tag = element.tag_name();
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        let type_attr = input.type_();
        match type_attr.as_str() {
            "submit" | "button" | "reset" | "image" => return None,
            "checkbox" | "radio" if !input.checked() => return None,
            _ => {}
        }
        let input_type = InputType::from_element(&tag, &type_attr);
        let value = if input_type == InputType::File {
            FieldValue::Files(selected_files(input))
        } else {
            FieldValue::Text(input.value())
        };
        return Some(FieldInput {
            name: input.name(),
            value,
            required: input.required(),
            max_length: max_length(input.max_length()),
            input_type,
        });
    }
    if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        return Some(FieldInput {
            name: area.name(),
            value: FieldValue::Text(area.value()),
            required: area.required(),
            max_length: max_length(area.max_length()),
            input_type: InputType::TextArea,
        });
    }
    let select = element.dyn_ref::<HtmlSelectElement>()?;
    Some(FieldInput {
        name: select.name(),
        value: FieldValue::Text(select.value()),
        required: select.required(),
        max_length: None,
        input_type: InputType::Other,
    })
}

/// `maxlength` is -1 when the attribute is absent
fn max_length(raw: i32) -> Option<usize> {
    usize::try_from(raw).ok()
}

fn selected_files(input: &HtmlInputElement) -> Vec<FileMeta> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|file: File| FileMeta {
            name: file.name(),
            size: file.size() as u64,
            mime: file.type_(),
            handle: Some(file),
        })
        .collect()
}
