// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{
    ContextId, FilterExpr, Person, PersonField, RemoteError, RequestId, ServiceMessage, Sorter,
};

/// Completions and out-of-band notifications produced by a [`RecordCollection`].
///
/// Collections never call back into the coordinator directly. They push these onto the
/// channel they were built with, and the event loop hands them to
/// `Coordinator::handle_remote` on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    BatchSettled {
        request_id: RequestId,
        result: Result<(), RemoteError>,
    },
    DeleteSettled {
        request_id: RequestId,
        context: ContextId,
        result: Result<(), RemoteError>,
    },
    ResetSettled {
        request_id: RequestId,
        result: Result<(), RemoteError>,
    },
    ContextVanished {
        context: ContextId,
    },
    Messages(Vec<ServiceMessage>),
}

/// Ordered, filterable, sortable projection of the remote people directory with
/// locally staged changes.
pub trait RecordCollection {
    /// Contexts in the current projection, after the active filter and sorter.
    fn contexts(&self) -> Vec<ContextId>;
    fn set_sorter(&mut self, sorter: Option<Sorter>);
    fn set_filter(&mut self, filter: Option<FilterExpr>);

    fn create_record(&mut self, initial: Person) -> Result<ContextId>;
    fn record(&self, context: ContextId) -> Option<Person>;
    fn field(&self, context: ContextId, field: PersonField) -> Option<String> {
        self.record(context).map(|person| person.get(field))
    }
    fn set_field(&mut self, context: ContextId, field: PersonField, value: &str) -> Result<()>;

    fn has_pending_changes(&self) -> bool;
    fn reset_changes(&mut self) -> Result<()>;
    /// Sends every staged change as one batch. Completion: [`RemoteEvent::BatchSettled`].
    fn submit_batch(&mut self, request_id: RequestId, group: &str) -> Result<()>;
    /// Stages deletion of a context. Completion: [`RemoteEvent::DeleteSettled`].
    fn delete(&mut self, request_id: RequestId, context: ContextId) -> Result<()>;

    fn set_keep_alive(&mut self, context: ContextId, keep_alive: bool) -> Result<()>;
    fn is_kept_alive(&self, context: ContextId) -> bool;

    /// Re-reads the remote rows. Kept-alive contexts whose row is gone get a
    /// [`RemoteEvent::ContextVanished`].
    fn refresh(&mut self) -> Result<()>;
    /// Asks the service to restore its demo directory. Completion: [`RemoteEvent::ResetSettled`].
    fn reset_data_source(&mut self, request_id: RequestId) -> Result<()>;
}
