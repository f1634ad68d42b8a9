//! Optimistic Sync Controller
//!
//! Turns a create or delete gesture into at most one server request and
//! reconciles the rendered lists with the outcome.
//!
//! Creations are rendered only after the server accepted them, using the
//! submitted form values. Items without a server identifier are deleted
//! locally, without a request.

mod phase;
mod ports;


use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::commands::{self, FormPayload, ServerResponse};
use crate::config::SyncConfig;
use crate::error::{RequestError, SyncError, TransportError};
use crate::models::{
    text_fields, ActionKind, CollectionItem, FieldInput, ItemKey, ItemOrigin, ItemRef, ListId,
    Notification, PendingAction,
};
use crate::validation::{self, FieldError, FieldErrorKind};

pub use phase::{ActionPhase, PhaseTracker};
pub use ports::{Confirmer, FormView, ListView, Notifier, Ports, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// New entry rendered at the end of its list
    Appended(CollectionItem),
    /// Profile update accepted; no list involved
    Updated,
    /// Accepted, but the target list is not on this page
    Unrendered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// User said no at the prompt
    Declined,
    /// Session-local item dropped without a request
    RemovedLocally,
    Removed,
}

#[derive(Clone)]
pub struct SyncController {
    inner: Rc<Inner>,
}

struct Inner {
    ports: Ports,
    config: Rc<SyncConfig>,
    in_flight: RefCell<Vec<(u64, PendingAction)>>,
    next_action: Cell<u64>,
    next_key: Cell<u64>,
    last_phases: RefCell<Vec<ActionPhase>>,
}

/// Clears the form's loading state however the action ends
struct LoadingGuard<'a> {
    form: &'a dyn FormView,
}

impl<'a> LoadingGuard<'a> {
    fn engage(form: &'a dyn FormView) -> Self {
        form.set_loading(true);
        Self { form }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.form.set_loading(false);
    }
}

/// Keeps a pending action registered while its request runs
struct InFlight<'a> {
    registry: &'a RefCell<Vec<(u64, PendingAction)>>,
    id: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.registry.borrow_mut().retain(|(id, _)| *id != self.id);
    }
}

impl SyncController {
    pub fn new(ports: Ports, config: Rc<SyncConfig>) -> Self {
        Self {
            inner: Rc::new(Inner {
                ports,
                config,
                in_flight: RefCell::new(Vec::new()),
                next_action: Cell::new(1),
                next_key: Cell::new(1),
                last_phases: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn shared_config(&self) -> Rc<SyncConfig> {
        self.inner.config.clone()
    }

    /// Fresh key for an item card, unique for the page lifetime
    pub fn next_item_key(&self) -> ItemKey {
        let key = self.inner.next_key.get();
        self.inner.next_key.set(key + 1);
        ItemKey(key)
    }

    /// Actions whose request has not resolved yet
    pub fn pending_count(&self) -> usize {
        self.inner.in_flight.borrow().len()
    }

    pub fn is_in_flight(&self, list: &ListId) -> bool {
        self.inner
            .in_flight
            .borrow()
            .iter()
            .any(|(_, action)| action.target() == Some(list))
    }

    /// Phase history of the most recently finished action
    pub fn last_phases(&self) -> Vec<ActionPhase> {
        self.inner.last_phases.borrow().clone()
    }

    // ========================
    // Create
    // ========================

    pub async fn submit_create(&self, form: &dyn FormView) -> Result<CreateOutcome, SyncError> {
        let kind = form.action_kind().ok_or(SyncError::NotEnhanced)?;
        let mut phases = PhaseTracker::default();
        self.step(&mut phases, ActionPhase::Validating);

        let inputs = form.inputs();
        let errors = self.apply_validation(form, &inputs);
        if !errors.is_empty() {
            log::warn!("[SYNC] {:?} rejected: {} invalid field(s)", kind, errors.len());
            self.finish(phases, ActionPhase::Idle);
            return Err(SyncError::Validation(errors));
        }

        let target = form
            .target_list()
            .or_else(|| kind.entry_kind().map(|entry| entry.list_id()));
        let fields = text_fields(&inputs);
        let action = PendingAction::Create { kind, fields: fields.clone(), target: target.clone() };
        let _in_flight = match self.claim(action) {
            Ok(guard) => guard,
            Err(err) => {
                self.finish(phases, ActionPhase::Idle);
                return Err(err);
            }
        };

        self.step(&mut phases, ActionPhase::Dispatched);
        let offset = self.inner.ports.viewport.scroll_offset();
        let _loading = LoadingGuard::engage(form);
        let result = commands::create_entry(
            self.inner.ports.transport.as_ref(),
            &form.action_url(),
            FormPayload::from_inputs(&inputs),
        )
        .await;

        match into_request_result(result) {
            Ok(response) => {
                self.step(&mut phases, ActionPhase::Succeeded);
                let outcome = self.reconcile_created(form, kind, target, fields, &response);
                self.inner.ports.viewport.restore_scroll(offset);
                self.finish(phases, ActionPhase::Idle);
                Ok(outcome)
            }
            Err((err, response)) => {
                log::warn!("[SYNC] {:?} failed: {}", kind, err);
                self.step(&mut phases, ActionPhase::Failed);
                let messages = &self.inner.config.messages;
                if let Some(response) = response {
                    for (field, message) in response.field_errors() {
                        let rejected = FieldError::new(field, FieldErrorKind::Server(message));
                        form.mark_invalid(&rejected.field, &rejected.message(messages));
                    }
                }
                self.inner
                    .ports
                    .notifier
                    .notify(Notification::error(format!("{}: {}", messages.create_failed, err.detail())));
                self.finish(phases, ActionPhase::Idle);
                Err(err.into())
            }
        }
    }

    fn reconcile_created(
        &self,
        form: &dyn FormView,
        kind: ActionKind,
        target: Option<ListId>,
        fields: Vec<(String, String)>,
        response: &ServerResponse,
    ) -> CreateOutcome {
        let messages = &self.inner.config.messages;
        let Some(entry) = kind.entry_kind() else {
            self.inner.ports.notifier.notify(Notification::success(messages.updated.clone()));
            log::info!("[SYNC] profile updated");
            return CreateOutcome::Updated;
        };

        let origin = match response.persisted_id(entry) {
            Some(id) => ItemOrigin::Persisted { delete_url: self.inner.config.delete_url(entry, &id) },
            None => ItemOrigin::SessionLocal,
        };
        let item = CollectionItem { key: self.next_item_key(), kind: entry, fields, origin };
        let list = target.unwrap_or_else(|| entry.list_id());

        let outcome = if self.inner.ports.lists.append(&list, &item) {
            log::info!("[SYNC] appended {} to {} ({:?})", item.key, list, item.origin);
            CreateOutcome::Appended(item)
        } else {
            log::warn!("[SYNC] list {} not on page, created {:?} not rendered", list, entry);
            CreateOutcome::Unrendered
        };
        form.reset();
        self.inner.ports.notifier.notify(Notification::success(messages.created.clone()));
        outcome
    }

    // ========================
    // Delete
    // ========================

    pub async fn submit_delete(&self, item: &ItemRef) -> Result<DeleteOutcome, SyncError> {
        let mut phases = PhaseTracker::default();
        self.step(&mut phases, ActionPhase::Validating);

        // Asking first would let a confirmed delete be dropped
        if !item.is_session_local() {
            if let Err(err) = self.check_idle(&item.list) {
                self.finish(phases, ActionPhase::Idle);
                return Err(err);
            }
        }

        if !self.inner.ports.confirmer.confirm(&self.confirm_prompt(item)) {
            log::debug!("[SYNC] delete of {} declined", item.key);
            self.finish(phases, ActionPhase::Idle);
            return Ok(DeleteOutcome::Declined);
        }

        let delete_url = match &item.origin {
            ItemOrigin::SessionLocal => {
                // Never round-tripped: nothing to delete on the server
                self.inner.ports.lists.remove(item);
                log::info!("[SYNC] removed session-local {} from {}", item.key, item.list);
                self.finish(phases, ActionPhase::Idle);
                return Ok(DeleteOutcome::RemovedLocally);
            }
            ItemOrigin::Persisted { delete_url } => delete_url.clone(),
        };

        let action = PendingAction::Delete { item: item.clone(), target: item.list.clone() };
        let _in_flight = match self.claim(action) {
            Ok(guard) => guard,
            Err(err) => {
                self.finish(phases, ActionPhase::Idle);
                return Err(err);
            }
        };

        self.step(&mut phases, ActionPhase::Dispatched);
        let offset = self.inner.ports.viewport.scroll_offset();
        let lists = &self.inner.ports.lists;
        lists.set_item_loading(item, true);

        let result = commands::delete_entry(self.inner.ports.transport.as_ref(), &delete_url).await;
        let messages = &self.inner.config.messages;
        match into_request_result(result) {
            Ok(_) => {
                self.step(&mut phases, ActionPhase::Succeeded);
                lists.remove(item);
                self.inner.ports.notifier.notify(Notification::success(messages.deleted.clone()));
                self.inner.ports.viewport.restore_scroll(offset);
                log::info!("[SYNC] deleted {} via {}", item.key, delete_url);
                self.finish(phases, ActionPhase::Idle);
                Ok(DeleteOutcome::Removed)
            }
            Err((err, _)) => {
                log::warn!("[SYNC] delete of {} failed: {}", item.key, err);
                self.step(&mut phases, ActionPhase::Failed);
                self.inner.ports.notifier.notify(Notification::error(messages.delete_failed.clone()));
                lists.set_item_loading(item, false);
                self.finish(phases, ActionPhase::Idle);
                Err(err.into())
            }
        }
    }

    /// Prompt text, quoting a shortened label when the item has one
    pub fn confirm_prompt(&self, item: &ItemRef) -> String {
        let config = &self.inner.config;
        match item.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => format!(
                "\"{}\"\n\n{}",
                shorten(label, config.confirm_label_max),
                config.messages.confirm_delete
            ),
            None => config.messages.confirm_delete.clone(),
        }
    }

    // ========================
    // Validation
    // ========================

    /// Re-check one field after it lost focus
    pub fn revalidate_field(&self, form: &dyn FormView, name: &str) -> bool {
        let inputs = form.inputs();
        let Some(input) = inputs.iter().find(|input| input.name == name) else {
            return true;
        };
        match validation::validate_field(input, &self.inner.config.upload) {
            Some(err) => {
                form.mark_invalid(name, &err.message(&self.inner.config.messages));
                false
            }
            None => {
                form.clear_invalid(name);
                true
            }
        }
    }

    /// Re-check a field while it is edited, but only once it shows an error
    pub fn revalidate_if_marked(&self, form: &dyn FormView, name: &str) -> bool {
        if !form.is_invalid(name) {
            return true;
        }
        self.revalidate_field(form, name)
    }

    /// Validate a form that submits natively; false blocks the submission
    pub fn validate_plain_form(&self, form: &dyn FormView) -> bool {
        self.apply_validation(form, &form.inputs()).is_empty()
    }

    fn apply_validation(&self, form: &dyn FormView, inputs: &[FieldInput]) -> Vec<FieldError> {
        let errors = validation::validate_form(inputs, &self.inner.config.upload);
        for input in inputs {
            match errors.iter().find(|err| err.field == input.name) {
                Some(err) => form.mark_invalid(&input.name, &err.message(&self.inner.config.messages)),
                None => form.clear_invalid(&input.name),
            }
        }
        errors
    }

    // ========================
    // Bookkeeping
    // ========================

    /// Reject, with a notice, an action on a list that is still busy
    fn check_idle(&self, list: &ListId) -> Result<(), SyncError> {
        if self.inner.config.guard_in_flight && self.is_in_flight(list) {
            log::warn!("[SYNC] {} busy, second action rejected", list);
            let messages = &self.inner.config.messages;
            self.inner.ports.notifier.notify(Notification::info(messages.busy.clone()));
            return Err(SyncError::Busy(list.clone()));
        }
        Ok(())
    }

    fn claim(&self, action: PendingAction) -> Result<InFlight<'_>, SyncError> {
        if let Some(list) = action.target() {
            self.check_idle(list)?;
        }
        let id = self.inner.next_action.get();
        self.inner.next_action.set(id + 1);
        self.inner.in_flight.borrow_mut().push((id, action));
        Ok(InFlight { registry: &self.inner.in_flight, id })
    }

    fn step(&self, phases: &mut PhaseTracker, next: ActionPhase) {
        match phases.advance(next) {
            Ok(()) => log::debug!("[SYNC] phase -> {:?}", next),
            Err(err) => log::error!("[SYNC] {}", err),
        }
    }

    fn finish(&self, mut phases: PhaseTracker, last: ActionPhase) {
        self.step(&mut phases, last);
        *self.inner.last_phases.borrow_mut() = phases.history().to_vec();
    }
}

/// Split a transport result into success, or a request error plus the
/// response it came from
fn into_request_result(
    result: Result<ServerResponse, TransportError>,
) -> Result<ServerResponse, (RequestError, Option<ServerResponse>)> {
    match result {
        Ok(response) if response.is_success() => Ok(response),
        Ok(response) => Err((
            RequestError::Status { status: response.status, message: response.server_message() },
            Some(response),
        )),
        Err(err) => Err((RequestError::Transport(err), None)),
    }
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
