// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use anyhow::{Result, anyhow, bail};
use rolodex_app::{
    ContextId, FilterExpr, Person, PersonField, PersonId, RecordCollection, RemoteError,
    RemoteEvent, RequestId, Sorter,
};
use tracing::{debug, info, warn};

use crate::{BatchOutcome, PersonChange, Store};

const DELETE_CANCELED: &str = "Deletion canceled by reset";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// `None` until the row has been committed.
    key: Option<PersonId>,
    person: Person,
    committed: Option<Person>,
    pending_delete: Option<RequestId>,
    kept_alive: bool,
}

impl Entry {
    fn is_dirty(&self) -> bool {
        self.key.is_none()
            || self.pending_delete.is_some()
            || self.committed.as_ref() != Some(&self.person)
    }
}

/// Staging layer over [`Store`]: edits, creates and deletes live here until a batch is
/// submitted. Completions go out on the event channel instead of being returned, so the
/// caller sees them the same way it would see a network reply.
pub struct DbCollection {
    store: Store,
    events: Sender<RemoteEvent>,
    entries: BTreeMap<ContextId, Entry>,
    last_context: i64,
    sorter: Option<Sorter>,
    filter: Option<FilterExpr>,
}

impl DbCollection {
    pub fn new(store: Store, events: Sender<RemoteEvent>) -> Result<Self> {
        let mut collection = Self {
            store,
            events,
            entries: BTreeMap::new(),
            last_context: 0,
            sorter: None,
            filter: None,
        };
        collection.reload()?;
        Ok(collection)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn person_id(&self, context: ContextId) -> Option<PersonId> {
        self.entries.get(&context).and_then(|entry| entry.key)
    }

    fn next_context(&mut self) -> ContextId {
        self.last_context = self.last_context.saturating_add(1);
        ContextId::new(self.last_context)
    }

    fn emit(&self, event: RemoteEvent) {
        if self.events.send(event).is_err() {
            warn!("remote event dropped: receiver is gone");
        }
    }

    fn entry_mut(&mut self, context: ContextId) -> Result<&mut Entry> {
        self.entries
            .get_mut(&context)
            .ok_or_else(|| anyhow!("record context {} is no longer available", context.get()))
    }

    /// Pulls the table into the staging map. Local edits survive; rows that vanished
    /// server-side are dropped and reported when something still holds them.
    fn reload(&mut self) -> Result<()> {
        let rows = self.store.list_people()?;
        let mut by_key = rows
            .into_iter()
            .map(|row| (row.id, row.person))
            .collect::<BTreeMap<_, _>>();

        let mut vanished = Vec::new();
        for (context, entry) in &mut self.entries {
            let Some(key) = entry.key else {
                continue;
            };
            match by_key.remove(&key) {
                Some(server) => {
                    if entry.committed.as_ref() == Some(&entry.person) {
                        entry.person = server.clone();
                    }
                    entry.committed = Some(server);
                }
                None => vanished.push((*context, entry.kept_alive, entry.pending_delete)),
            }
        }

        for (context, kept_alive, pending_delete) in vanished {
            self.entries.remove(&context);
            debug!(context = context.get(), "record removed server-side");
            if let Some(request_id) = pending_delete {
                self.emit(RemoteEvent::DeleteSettled {
                    request_id,
                    context,
                    result: Ok(()),
                });
            }
            if kept_alive {
                self.emit(RemoteEvent::ContextVanished { context });
            }
        }

        for (key, person) in by_key {
            let context = self.next_context();
            self.entries.insert(
                context,
                Entry {
                    key: Some(key),
                    committed: Some(person.clone()),
                    person,
                    pending_delete: None,
                    kept_alive: false,
                },
            );
        }
        Ok(())
    }

    fn settle_failed_batch(&self, request_id: RequestId, message: String) {
        warn!(request = request_id.get(), "batch failed: {message}");
        self.emit(RemoteEvent::BatchSettled {
            request_id,
            result: Err(RemoteError::failed(message)),
        });
    }
}

impl RecordCollection for DbCollection {
    fn contexts(&self) -> Vec<ContextId> {
        let mut visible = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.pending_delete.is_none())
            .filter(|(_, entry)| {
                self.filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(&entry.person))
            })
            .collect::<Vec<_>>();
        if let Some(sorter) = self.sorter {
            visible.sort_by(|(_, left), (_, right)| sorter.compare(&left.person, &right.person));
        }
        visible.into_iter().map(|(context, _)| *context).collect()
    }

    fn set_sorter(&mut self, sorter: Option<Sorter>) {
        self.sorter = sorter;
    }

    fn set_filter(&mut self, filter: Option<FilterExpr>) {
        self.filter = filter;
    }

    fn create_record(&mut self, initial: Person) -> Result<ContextId> {
        let context = self.next_context();
        self.entries.insert(
            context,
            Entry {
                key: None,
                person: initial,
                committed: None,
                pending_delete: None,
                kept_alive: false,
            },
        );
        debug!(context = context.get(), "transient record created");
        Ok(context)
    }

    fn record(&self, context: ContextId) -> Option<Person> {
        self.entries.get(&context).map(|entry| entry.person.clone())
    }

    fn set_field(&mut self, context: ContextId, field: PersonField, value: &str) -> Result<()> {
        let entry = self.entry_mut(context)?;
        if entry.pending_delete.is_some() {
            bail!("record context {} is being deleted", context.get());
        }
        let person = &mut entry.person;
        match field {
            PersonField::UserName => person.user_name = value.to_owned(),
            PersonField::FirstName => person.first_name = value.to_owned(),
            PersonField::LastName => person.last_name = value.to_owned(),
            PersonField::Age => {
                person.age = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Age must be a whole number, got {value:?}"))?;
            }
        }
        Ok(())
    }

    fn has_pending_changes(&self) -> bool {
        self.entries.values().any(Entry::is_dirty)
    }

    fn reset_changes(&mut self) -> Result<()> {
        let discarded = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.key.is_none() && entry.kept_alive)
            .map(|(context, _)| *context)
            .collect::<Vec<_>>();
        self.entries.retain(|_, entry| entry.key.is_some());
        for context in discarded {
            self.emit(RemoteEvent::ContextVanished { context });
        }

        let mut canceled = Vec::new();
        for (context, entry) in &mut self.entries {
            if let Some(committed) = &entry.committed {
                entry.person = committed.clone();
            }
            if let Some(request_id) = entry.pending_delete.take() {
                canceled.push((request_id, *context));
            }
        }
        for (request_id, context) in canceled {
            self.emit(RemoteEvent::DeleteSettled {
                request_id,
                context,
                result: Err(RemoteError::canceled(DELETE_CANCELED)),
            });
        }
        Ok(())
    }

    fn submit_batch(&mut self, request_id: RequestId, group: &str) -> Result<()> {
        let mut changes = Vec::new();
        let mut creates = Vec::new();
        let mut deletes = Vec::new();
        for (context, entry) in &self.entries {
            match (entry.key, entry.pending_delete) {
                (Some(key), Some(delete_request)) => {
                    changes.push(PersonChange::Delete(key));
                    deletes.push((*context, delete_request));
                }
                (None, _) => {
                    changes.push(PersonChange::Create(entry.person.clone()));
                    creates.push(*context);
                }
                (Some(key), None) if entry.is_dirty() => {
                    changes.push(PersonChange::Update(key, entry.person.clone()));
                }
                (Some(_), None) => {}
            }
        }
        debug!(
            request = request_id.get(),
            group,
            changes = changes.len(),
            "submitting batch"
        );

        let outcome = match self.store.apply_batch(&changes) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.settle_failed_batch(request_id, format!("{error:#}"));
                return Ok(());
            }
        };

        match outcome {
            BatchOutcome::Rejected(errors) => {
                let messages = errors
                    .iter()
                    .map(crate::ValidationError::to_message)
                    .collect::<Vec<_>>();
                self.emit(RemoteEvent::Messages(messages));
                self.settle_failed_batch(
                    request_id,
                    format!("service rejected the batch ({} problem(s))", errors.len()),
                );
            }
            BatchOutcome::Committed { created } => {
                for (context, key) in creates.into_iter().zip(created) {
                    if let Some(entry) = self.entries.get_mut(&context) {
                        entry.key = Some(key);
                    }
                }
                for entry in self.entries.values_mut() {
                    if entry.pending_delete.is_none() {
                        entry.committed = Some(entry.person.clone());
                    }
                }
                for (context, delete_request) in &deletes {
                    self.entries.remove(context);
                    self.emit(RemoteEvent::DeleteSettled {
                        request_id: *delete_request,
                        context: *context,
                        result: Ok(()),
                    });
                }
                info!(
                    request = request_id.get(),
                    changes = changes.len(),
                    "batch committed"
                );
                self.emit(RemoteEvent::BatchSettled {
                    request_id,
                    result: Ok(()),
                });
            }
        }
        Ok(())
    }

    fn delete(&mut self, request_id: RequestId, context: ContextId) -> Result<()> {
        let entry = self.entry_mut(context)?;
        if entry.pending_delete.is_some() {
            bail!("record context {} is already being deleted", context.get());
        }
        if entry.key.is_none() {
            // Never reached the service, so there is nothing to wait for.
            self.entries.remove(&context);
            self.emit(RemoteEvent::DeleteSettled {
                request_id,
                context,
                result: Ok(()),
            });
            return Ok(());
        }
        entry.pending_delete = Some(request_id);
        Ok(())
    }

    fn set_keep_alive(&mut self, context: ContextId, keep_alive: bool) -> Result<()> {
        match self.entries.get_mut(&context) {
            Some(entry) => {
                entry.kept_alive = keep_alive;
                Ok(())
            }
            None if !keep_alive => Ok(()),
            None => bail!("record context {} is no longer available", context.get()),
        }
    }

    fn is_kept_alive(&self, context: ContextId) -> bool {
        self.entries
            .get(&context)
            .is_some_and(|entry| entry.kept_alive)
    }

    fn refresh(&mut self) -> Result<()> {
        self.reload()
    }

    fn reset_data_source(&mut self, request_id: RequestId) -> Result<()> {
        let result = self
            .store
            .reset_demo()
            .map_err(|error| RemoteError::failed(format!("{error:#}")));
        if let Err(error) = &result {
            warn!(request = request_id.get(), "data source reset failed: {error}");
        }
        self.emit(RemoteEvent::ResetSettled { request_id, result });
        Ok(())
    }
}
