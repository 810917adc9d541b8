//! Entity manager panel.
//!
//! [`PanelState`] is a plain state container. [`PanelState::apply`] moves it
//! from one state to the next and returns the API call, if any, that the
//! transition asks for. [`Panel`] runs those calls against a [`RecordStore`]
//! and feeds the outcomes back in.
//!
//! Every effect carries a [`Ticket`]. Results are only accepted for the ticket
//! the state is waiting on, so a result that arrives after the panel was
//! unmounted, or after a newer fetch was started, is dropped.

use std::{sync::Arc, time::Instant};

use entity::{Draft, FieldErrors, Record, RecordId, Submission};
use platform_api::RecordStore;
use tracing::{debug, info, warn};

use crate::{Notification, PanelError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Identifies one effect. `epoch` changes on unmount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

/// API call requested by a transition.
#[derive(Clone, Debug)]
pub enum Effect<R: Record> {
    Fetch(Ticket),
    Create {
        ticket: Ticket,
        payload: R::Payload,
    },
    Update {
        ticket: Ticket,
        id: RecordId,
        payload: R::Payload,
    },
    Delete {
        ticket: Ticket,
        id: RecordId,
    },
}

#[derive(Clone, Debug)]
pub enum Action<R: Record> {
    Refresh,
    Fetched {
        ticket: Ticket,
        result: Result<Vec<R>, String>,
    },
    OpenEditor(Option<R>),
    CloseEditor,
    Submit,
    Submitted {
        ticket: Ticket,
        result: Result<(), String>,
        at: Instant,
    },
    RequestDelete(RecordId),
    CancelDelete,
    ConfirmDelete,
    Deleted {
        ticket: Ticket,
        result: Result<(), String>,
        at: Instant,
    },
    DismissBanner,
    Tick(Instant),
    Unmount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "added",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
        }
    }
}

#[derive(Clone, Debug)]
struct InFlight {
    ticket: Ticket,
    kind: Mutation,
    /// Set for deletes only.
    deleted: Option<RecordId>,
}

#[derive(Clone, Debug)]
pub struct PanelState<R: Record> {
    items: Vec<R>,
    load: LoadState,
    editor: Option<R::Draft>,
    field_errors: FieldErrors,
    notification: Option<Notification>,
    banner: Option<String>,
    pending_delete: Option<RecordId>,
    in_flight: Option<InFlight>,
    latest_fetch: Option<Ticket>,
    mounted: bool,
    epoch: u64,
    seq: u64,
}

impl<R: Record> Default for PanelState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load: LoadState::Loading,
            editor: None,
            field_errors: FieldErrors::new(),
            notification: None,
            banner: None,
            pending_delete: None,
            in_flight: None,
            latest_fetch: None,
            mounted: true,
            epoch: 0,
            seq: 0,
        }
    }
}

impl<R: Record> PanelState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn load(&self) -> &LoadState {
        &self.load
    }

    pub fn editor(&self) -> Option<&R::Draft> {
        self.editor.as_ref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// The success message, if it is still within its display window.
    pub fn notification(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_visible(now))
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// True while a create, update or delete is waiting on the API.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn row(&self, index: usize) -> Result<&R, PanelError> {
        self.items.get(index).ok_or(PanelError::NoSuchRow(index))
    }

    pub fn edit(&mut self, field: &str, value: &str) -> Result<(), PanelError> {
        let draft = self.editor.as_mut().ok_or(PanelError::EditorClosed)?;
        draft.set(field, value)?;
        Ok(())
    }

    /// Show an error that did not come from this panel's own effects.
    pub fn surface_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(entity = R::LABEL, error = %message, "panel error");
        self.banner = Some(message);
    }

    pub fn apply(&mut self, action: Action<R>) -> Option<Effect<R>> {
        match action {
            Action::Refresh => self.begin_fetch(),
            Action::Fetched { ticket, result } => {
                self.finish_fetch(ticket, result);
                None
            }
            Action::OpenEditor(record) => {
                self.editor = Some(record.map(|r| r.to_draft()).unwrap_or_default());
                self.field_errors.clear();
                None
            }
            Action::CloseEditor => {
                self.editor = None;
                self.field_errors.clear();
                None
            }
            Action::Submit => self.begin_submit(),
            Action::Submitted { ticket, result, at } => self.finish_mutation(ticket, result, at),
            Action::RequestDelete(id) => {
                self.pending_delete = Some(id);
                None
            }
            Action::CancelDelete => {
                self.pending_delete = None;
                None
            }
            Action::ConfirmDelete => self.begin_delete(),
            Action::Deleted { ticket, result, at } => self.finish_mutation(ticket, result, at),
            Action::DismissBanner => {
                self.banner = None;
                None
            }
            Action::Tick(now) => {
                if self.notification.as_ref().is_some_and(|n| !n.is_visible(now)) {
                    self.notification = None;
                }
                None
            }
            Action::Unmount => {
                self.mounted = false;
                self.epoch += 1;
                self.in_flight = None;
                self.latest_fetch = None;
                None
            }
        }
    }

    fn is_editing(&self, id: &RecordId) -> bool {
        self.editor
            .as_ref()
            .and_then(|draft| draft.id())
            .is_some_and(|current| current.same_as(id))
    }

    fn next_ticket(&mut self) -> Ticket {
        self.seq += 1;
        Ticket {
            epoch: self.epoch,
            seq: self.seq,
        }
    }

    fn begin_fetch(&mut self) -> Option<Effect<R>> {
        if !self.mounted {
            return None;
        }
        self.load = LoadState::Loading;
        let ticket = self.next_ticket();
        self.latest_fetch = Some(ticket);
        Some(Effect::Fetch(ticket))
    }

    fn finish_fetch(&mut self, ticket: Ticket, result: Result<Vec<R>, String>) {
        if self.latest_fetch != Some(ticket) {
            debug!(entity = R::LABEL, ?ticket, "discarding stale fetch result");
            return;
        }
        self.latest_fetch = None;
        match result {
            Ok(items) => {
                debug!(entity = R::LABEL, count = items.len(), "collection loaded");
                self.items = items;
                self.load = LoadState::Loaded;
            }
            Err(message) => {
                self.load = LoadState::Failed(message.clone());
                self.surface_error(message);
            }
        }
    }

    fn begin_submit(&mut self) -> Option<Effect<R>> {
        if self.in_flight.is_some() {
            debug!(entity = R::LABEL, "submit ignored while a request is in flight");
            return None;
        }
        let draft = self.editor.clone()?;
        match draft.into_submission() {
            Err(errors) => {
                debug!(entity = R::LABEL, fields = errors.len(), "draft rejected");
                self.field_errors = errors;
                None
            }
            Ok(submission) => {
                self.field_errors.clear();
                let ticket = self.next_ticket();
                let (kind, effect) = match submission {
                    Submission::Create(payload) => {
                        (Mutation::Create, Effect::Create { ticket, payload })
                    }
                    Submission::Update { id, payload } => (
                        Mutation::Update,
                        Effect::Update {
                            ticket,
                            id,
                            payload,
                        },
                    ),
                };
                self.in_flight = Some(InFlight {
                    ticket,
                    kind,
                    deleted: None,
                });
                Some(effect)
            }
        }
    }

    fn begin_delete(&mut self) -> Option<Effect<R>> {
        if self.in_flight.is_some() {
            debug!(entity = R::LABEL, "delete ignored while a request is in flight");
            return None;
        }
        let id = self.pending_delete.take()?;
        let ticket = self.next_ticket();
        self.in_flight = Some(InFlight {
            ticket,
            kind: Mutation::Delete,
            deleted: Some(id.clone()),
        });
        Some(Effect::Delete { ticket, id })
    }

    fn finish_mutation(
        &mut self,
        ticket: Ticket,
        result: Result<(), String>,
        at: Instant,
    ) -> Option<Effect<R>> {
        let flight = match self.in_flight.take() {
            Some(flight) if flight.ticket == ticket => flight,
            other => {
                self.in_flight = other;
                debug!(entity = R::LABEL, ?ticket, "discarding stale mutation result");
                return None;
            }
        };
        match result {
            Ok(()) => {
                let close_editor = match &flight.deleted {
                    Some(id) => self.is_editing(id),
                    None => true,
                };
                if close_editor {
                    self.editor = None;
                    self.field_errors.clear();
                }
                let message = format!("{} {} successfully!", R::LABEL, flight.kind.verb());
                info!(entity = R::LABEL, "{message}");
                self.notification = Some(Notification::new(message, at));
                self.begin_fetch()
            }
            Err(message) => {
                self.surface_error(message);
                None
            }
        }
    }
}

/// Runs a [`PanelState`] against a record store.
pub struct Panel<R: Record> {
    state: PanelState<R>,
    store: Arc<dyn RecordStore<R>>,
}

impl<R: Record> Panel<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self {
            state: PanelState::new(),
            store,
        }
    }

    pub fn state(&self) -> &PanelState<R> {
        &self.state
    }

    /// Apply an action, then run effects until the state stops asking for one.
    pub async fn dispatch(&mut self, action: Action<R>) {
        let mut next = self.state.apply(action);
        while let Some(effect) = next {
            if !self.state.is_mounted() {
                debug!(entity = R::LABEL, "panel unmounted; dropping effect");
                break;
            }
            let outcome = self.run(effect).await;
            next = self.state.apply(outcome);
        }
    }

    async fn run(&self, effect: Effect<R>) -> Action<R> {
        match effect {
            Effect::Fetch(ticket) => Action::Fetched {
                ticket,
                result: self.store.list().await.map_err(|err| err.to_string()),
            },
            Effect::Create { ticket, payload } => Action::Submitted {
                ticket,
                result: self
                    .store
                    .create(&payload)
                    .await
                    .map(drop)
                    .map_err(|err| err.to_string()),
                at: Instant::now(),
            },
            Effect::Update {
                ticket,
                id,
                payload,
            } => Action::Submitted {
                ticket,
                result: self
                    .store
                    .update(&id, &payload)
                    .await
                    .map(drop)
                    .map_err(|err| err.to_string()),
                at: Instant::now(),
            },
            Effect::Delete { ticket, id } => Action::Deleted {
                ticket,
                result: self.store.delete(&id).await.map_err(|err| err.to_string()),
                at: Instant::now(),
            },
        }
    }

    pub async fn list(&mut self) {
        self.dispatch(Action::Refresh).await;
    }

    pub async fn open_editor(&mut self, record: Option<R>) {
        self.dispatch(Action::OpenEditor(record)).await;
    }

    /// Open the editor on the record shown in `index`.
    pub async fn open_row(&mut self, index: usize) -> Result<(), PanelError> {
        let record = self.state.row(index)?.clone();
        self.open_editor(Some(record)).await;
        Ok(())
    }

    pub fn edit(&mut self, field: &str, value: &str) -> Result<(), PanelError> {
        self.state.edit(field, value)
    }

    pub async fn close_editor(&mut self) {
        self.dispatch(Action::CloseEditor).await;
    }

    pub async fn submit(&mut self) {
        self.dispatch(Action::Submit).await;
    }

    pub async fn request_delete(&mut self, id: RecordId) {
        self.dispatch(Action::RequestDelete(id)).await;
    }

    pub async fn request_delete_row(&mut self, index: usize) -> Result<(), PanelError> {
        let id = self.state.row(index)?.id().clone();
        self.request_delete(id).await;
        Ok(())
    }

    pub async fn confirm_delete(&mut self) {
        self.dispatch(Action::ConfirmDelete).await;
    }

    pub async fn cancel_delete(&mut self) {
        self.dispatch(Action::CancelDelete).await;
    }

    pub async fn dismiss_banner(&mut self) {
        self.dispatch(Action::DismissBanner).await;
    }

    pub async fn tick(&mut self, now: Instant) {
        self.dispatch(Action::Tick(now)).await;
    }

    pub fn surface_error(&mut self, message: impl Into<String>) {
        self.state.surface_error(message);
    }

    pub async fn unmount(&mut self) {
        self.dispatch(Action::Unmount).await;
    }
}
