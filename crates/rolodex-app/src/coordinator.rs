// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::detail::{DetailLifecycle, DetailPane};
use crate::forms::{FieldInputError, normalize_input};
use crate::ledger::PendingChangeLedger;
use crate::messages::{MessageStore, TechnicalMessageSurfacer};
use crate::sorting::{ListQuery, sort_label};
use crate::{
    AppCommand, AppEvent, BATCH_GROUP, ContextId, DetailLayout, DialogId, Notice, Person,
    PersonField, RecordCollection, RefreshConflict, RemoteError, RemoteEvent, RequestId,
    SearchCase, ServiceMessage, SortState, TextCatalog, TextKey, UiState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorSettings {
    pub search_case: SearchCase,
    pub refresh_conflict: RefreshConflict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingDelete {
    context: ContextId,
    user_name: String,
}

/// Drives the list/detail editing session on top of a [`RecordCollection`].
///
/// Every entry point returns the events it produced. Completion handlers re-read the
/// current list selection instead of trusting anything captured when the request was
/// issued, because other commands may run while a request is outstanding.
pub struct Coordinator<C: RecordCollection> {
    collection: C,
    texts: TextCatalog,
    settings: CoordinatorSettings,
    ui: UiState,
    ledger: PendingChangeLedger,
    query: ListQuery,
    detail: DetailLifecycle,
    messages: MessageStore,
    surfacer: TechnicalMessageSurfacer,
    list_selection: Option<ContextId>,
    last_request: i64,
    in_flight_save: Option<RequestId>,
    in_flight_reset: Option<RequestId>,
    pending_deletes: BTreeMap<RequestId, PendingDelete>,
}

impl<C: RecordCollection> Coordinator<C> {
    pub fn new(collection: C, texts: TextCatalog, settings: CoordinatorSettings) -> Self {
        Self::from_parts(
            collection,
            UiState::default(),
            MessageStore::default(),
            texts,
            settings,
        )
    }

    pub fn from_parts(
        collection: C,
        ui: UiState,
        messages: MessageStore,
        texts: TextCatalog,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            collection,
            texts,
            settings,
            ui,
            ledger: PendingChangeLedger::default(),
            query: ListQuery::new(settings.search_case),
            detail: DetailLifecycle::default(),
            messages,
            surfacer: TechnicalMessageSurfacer::default(),
            list_selection: None,
            last_request: 0,
            in_flight_save: None,
            in_flight_reset: None,
            pending_deletes: BTreeMap::new(),
        }
    }

    pub const fn ui(&self) -> UiState {
        self.ui
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.collection
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub const fn list_selection(&self) -> Option<ContextId> {
        self.list_selection
    }

    pub fn detail_context(&self) -> Option<ContextId> {
        self.detail.pinned()
    }

    pub fn detail_record(&self) -> Option<Person> {
        self.detail
            .pinned()
            .and_then(|context| self.collection.record(context))
    }

    pub fn layout(&self) -> DetailLayout {
        self.detail.layout()
    }

    pub const fn sort(&self) -> SortState {
        self.query.sort()
    }

    pub fn search_text(&self) -> &str {
        self.query.search_text()
    }

    pub const fn open_dialog(&self) -> Option<DialogId> {
        self.surfacer.open_dialog()
    }

    pub const fn technical_errors(&self) -> bool {
        self.ledger.technical_errors()
    }

    pub fn texts(&self) -> &TextCatalog {
        &self.texts
    }

    pub fn rows(&self) -> Vec<(ContextId, Person)> {
        self.collection
            .contexts()
            .into_iter()
            .filter_map(|context| {
                self.collection
                    .record(context)
                    .map(|person| (context, person))
            })
            .collect()
    }

    pub fn has_in_flight_requests(&self) -> bool {
        self.in_flight_save.is_some()
            || self.in_flight_reset.is_some()
            || !self.pending_deletes.is_empty()
    }

    /// Marks the detail pane as torn down; selection changes become no-ops.
    pub fn detach_view(&mut self) {
        self.detail.detach();
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        debug!(?command, "dispatch");
        let before = self.ui;
        let mut events = Vec::new();
        match command {
            AppCommand::Create => self.create(&mut events),
            AppCommand::Save => self.save(&mut events),
            AppCommand::Delete => self.delete(&mut events),
            AppCommand::ResetChanges => self.reset_changes(&mut events),
            AppCommand::Refresh => self.refresh(&mut events),
            AppCommand::ResetDataSource => self.reset_data_source(&mut events),
            AppCommand::CycleSort => self.cycle_sort(&mut events),
            AppCommand::Search(needle) => self.search(&needle, &mut events),
            AppCommand::SelectItem(context) => self.select_item(context, &mut events),
            AppCommand::EditField {
                context,
                field,
                value,
            } => self.edit_field(context, field, &value, &mut events),
            AppCommand::CancelInput => {
                self.recompute(None);
            }
            AppCommand::CloseDialog(dialog) => {
                if self.surfacer.close(dialog) {
                    events.push(AppEvent::DialogClosed(dialog));
                }
            }
        }
        self.finish(before, events)
    }

    pub fn handle_remote(&mut self, event: RemoteEvent) -> Vec<AppEvent> {
        let before = self.ui;
        let mut events = Vec::new();
        match event {
            RemoteEvent::BatchSettled { request_id, result } => {
                if self.in_flight_save == Some(request_id) {
                    self.in_flight_save = None;
                    self.settle_save(result, &mut events);
                } else {
                    debug!(request = request_id.get(), "ignoring stale batch completion");
                }
            }
            RemoteEvent::DeleteSettled {
                request_id,
                context,
                result,
            } => self.settle_delete(request_id, context, result, &mut events),
            RemoteEvent::ResetSettled { request_id, result } => {
                if self.in_flight_reset == Some(request_id) {
                    self.in_flight_reset = None;
                    self.settle_reset_data_source(result, &mut events);
                }
            }
            RemoteEvent::ContextVanished { context } => {
                self.handle_vanished(context, &mut events);
            }
            RemoteEvent::Messages(batch) => self.receive_messages(batch, &mut events),
        }
        self.finish(before, events)
    }

    fn finish(&self, before: UiState, mut events: Vec<AppEvent>) -> Vec<AppEvent> {
        if self.ui != before {
            events.push(AppEvent::UiStateChanged(self.ui));
        }
        events
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request = self.last_request.saturating_add(1);
        RequestId::new(self.last_request)
    }

    fn recompute(&mut self, explicit: Option<bool>) -> bool {
        self.ledger
            .recompute(&mut self.ui, &self.collection, explicit)
    }

    fn notify(&self, events: &mut Vec<AppEvent>, notice: Notice) {
        if notice.is_error() {
            warn!(text = notice.text(), "error notice");
        }
        events.push(AppEvent::Notified(notice));
    }

    fn create(&mut self, events: &mut Vec<AppEvent>) {
        let context = match self.collection.create_record(Person::blank()) {
            Ok(context) => context,
            Err(error) => {
                self.notify(events, Notice::Error(format!("{error:#}")));
                return;
            }
        };
        self.recompute(None);
        self.list_selection = Some(context);
        events.push(AppEvent::ListSelectionChanged(Some(context)));
        events.push(AppEvent::FocusRequested(context));
    }

    fn save(&mut self, events: &mut Vec<AppEvent>) {
        let request_id = self.next_request_id();
        self.ui.busy = true;
        let submitted = self.collection.submit_batch(request_id, BATCH_GROUP);
        // The flag drops as soon as the batch leaves, not when it settles.
        self.ledger.clear_technical_error();
        match submitted {
            Ok(()) => self.in_flight_save = Some(request_id),
            Err(error) => self.settle_save(Err(RemoteError::from(error)), events),
        }
    }

    fn settle_save(&mut self, result: Result<(), RemoteError>, events: &mut Vec<AppEvent>) {
        self.ui.busy = false;
        match result {
            Ok(()) => {
                info!("batch committed");
                self.notify(events, Notice::Success(self.texts.text(TextKey::ChangesSent)));
                self.recompute(Some(false));
            }
            Err(error) => {
                self.recompute(Some(false));
                self.notify(events, Notice::Error(error.message().to_owned()));
            }
        }
    }

    fn delete(&mut self, events: &mut Vec<AppEvent>) {
        let Some(context) = self.list_selection else {
            return;
        };
        let user_name = self
            .collection
            .field(context, PersonField::KEY)
            .unwrap_or_default();
        let request_id = self.next_request_id();
        let requested = self.collection.delete(request_id, context);
        self.pending_deletes.insert(
            request_id,
            PendingDelete {
                context,
                user_name,
            },
        );
        self.show_detail(None, events);
        self.recompute(None);

        if let Err(error) = requested {
            self.settle_delete(request_id, context, Err(RemoteError::from(error)), events);
        }
    }

    fn settle_delete(
        &mut self,
        request_id: RequestId,
        context: ContextId,
        result: Result<(), RemoteError>,
        events: &mut Vec<AppEvent>,
    ) {
        let Some(pending) = self.pending_deletes.remove(&request_id) else {
            debug!(
                request = request_id.get(),
                context = context.get(),
                "ignoring unknown delete completion"
            );
            return;
        };

        match result {
            Ok(()) => {
                info!(user = %pending.user_name, "deletion confirmed");
                if self.list_selection == Some(pending.context) {
                    self.list_selection = None;
                    events.push(AppEvent::ListSelectionChanged(None));
                }
                let text = self
                    .texts
                    .format(TextKey::DeletionSuccess, &[&pending.user_name]);
                self.notify(events, Notice::Success(text));
            }
            Err(error) => {
                if self.list_selection == Some(pending.context) {
                    self.show_detail(Some(pending.context), events);
                }
                self.recompute(None);
                let notice = if error.is_canceled() {
                    Notice::Info(
                        self.texts
                            .format(TextKey::DeletionRestored, &[&pending.user_name]),
                    )
                } else {
                    Notice::Error(self.texts.format(
                        TextKey::DeleteFailed,
                        &[error.message(), &pending.user_name],
                    ))
                };
                self.notify(events, notice);
            }
        }
    }

    fn reset_changes(&mut self, events: &mut Vec<AppEvent>) {
        if let Err(error) = self.collection.reset_changes() {
            self.notify(events, Notice::Error(format!("{error:#}")));
        }
        self.ledger.clear_technical_error();
        self.recompute(None);
        self.drop_stale_selection(events);
    }

    fn refresh(&mut self, events: &mut Vec<AppEvent>) {
        if self.collection.has_pending_changes() {
            self.notify(
                events,
                Notice::Error(self.texts.text(TextKey::RefreshNotPossible)),
            );
            if self.settings.refresh_conflict == RefreshConflict::Abort {
                return;
            }
        }
        match self.collection.refresh() {
            Ok(()) => {
                self.drop_stale_selection(events);
                self.notify(events, Notice::Success(self.texts.text(TextKey::RefreshSuccess)));
            }
            Err(error) => self.notify(events, Notice::Error(format!("{error:#}"))),
        }
    }

    /// Forgets a list selection whose record the collection no longer holds.
    fn drop_stale_selection(&mut self, events: &mut Vec<AppEvent>) {
        let Some(context) = self.list_selection else {
            return;
        };
        if self.collection.record(context).is_none() {
            debug!(context = context.get(), "selected record is gone");
            self.list_selection = None;
            events.push(AppEvent::ListSelectionChanged(None));
        }
    }

    fn reset_data_source(&mut self, events: &mut Vec<AppEvent>) {
        let request_id = self.next_request_id();
        match self.collection.reset_data_source(request_id) {
            Ok(()) => self.in_flight_reset = Some(request_id),
            Err(error) => {
                self.settle_reset_data_source(Err(RemoteError::from(error)), events);
            }
        }
    }

    fn settle_reset_data_source(
        &mut self,
        result: Result<(), RemoteError>,
        events: &mut Vec<AppEvent>,
    ) {
        let refreshed = result.and_then(|()| {
            self.collection
                .refresh()
                .map_err(RemoteError::from)
        });
        match refreshed {
            Ok(()) => {
                info!("data source restored");
                self.drop_stale_selection(events);
                let text = self.texts.text(TextKey::SourceResetSuccess);
                self.notify(events, Notice::Success(text));
            }
            Err(error) => self.notify(events, Notice::Error(error.message().to_owned())),
        }
    }

    fn cycle_sort(&mut self, events: &mut Vec<AppEvent>) {
        let state = self.query.cycle_sort(&mut self.collection);
        let label = sort_label(&self.texts, state);
        events.push(AppEvent::SortChanged(state));
        let text = self.texts.format(TextKey::SortMessage, &[&label]);
        self.notify(events, Notice::Info(text));
    }

    fn search(&mut self, needle: &str, events: &mut Vec<AppEvent>) {
        self.query.search(&mut self.collection, needle);
        events.push(AppEvent::FilterChanged(needle.to_owned()));
    }

    fn select_item(&mut self, context: Option<ContextId>, events: &mut Vec<AppEvent>) {
        self.list_selection = context;
        events.push(AppEvent::ListSelectionChanged(context));
        self.show_detail(context, events);
    }

    fn show_detail(&mut self, context: Option<ContextId>, events: &mut Vec<AppEvent>) {
        if let Some(pane) = self.detail.select(&mut self.collection, context) {
            push_pane_events(pane, events);
        }
    }

    fn handle_vanished(&mut self, context: ContextId, events: &mut Vec<AppEvent>) {
        let Some(pane) = self.detail.handle_vanished(&mut self.collection, context) else {
            return;
        };
        info!(context = context.get(), "pinned record vanished");
        push_pane_events(pane, events);
        if self.list_selection == Some(context) {
            self.list_selection = None;
            events.push(AppEvent::ListSelectionChanged(None));
        }
    }

    fn edit_field(
        &mut self,
        context: ContextId,
        field: PersonField,
        raw: &str,
        events: &mut Vec<AppEvent>,
    ) {
        let value = match normalize_input(field, raw) {
            Ok(value) => value,
            Err(FieldInputError::InvalidAge(input)) => {
                let text = self.texts.format(TextKey::AgeInvalid, &[&input]);
                self.notify(events, Notice::Error(text));
                return;
            }
        };
        if let Err(error) = self.collection.set_field(context, field, &value) {
            self.notify(events, Notice::Error(format!("{error:#}")));
            return;
        }
        self.recompute(Some(true));
        let named = self
            .collection
            .record(context)
            .is_some_and(|person| !person.is_unnamed());
        if named {
            self.ui.user_name_empty = false;
        }
    }

    fn receive_messages(&mut self, batch: Vec<ServiceMessage>, events: &mut Vec<AppEvent>) {
        for message in &batch {
            warn!(
                technical = message.technical,
                severity = message.severity.as_str(),
                "service message: {}",
                message.text
            );
        }
        self.messages.extend(batch);

        let Some(surfaced) = self.surfacer.on_messages_changed(&mut self.messages) else {
            return;
        };
        self.ledger.mark_technical_error();
        self.recompute(Some(true));
        self.notify(
            events,
            Notice::ServiceError {
                dialog: surfaced.dialog,
                text: surfaced.text,
            },
        );
    }
}

fn push_pane_events(pane: DetailPane, events: &mut Vec<AppEvent>) {
    events.push(AppEvent::DetailChanged(pane.context));
    events.push(AppEvent::LayoutChanged(pane.layout));
}
