// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DialogId, MessageId, ServiceMessage, StoredMessage};

/// Holds service messages until something consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    next_id: i64,
    entries: Vec<StoredMessage>,
}

impl MessageStore {
    pub fn push(&mut self, message: ServiceMessage) -> MessageId {
        self.next_id = self.next_id.saturating_add(1);
        let id = MessageId::new(self.next_id);
        self.entries.push(StoredMessage { id, message });
        id
    }

    pub fn extend<I: IntoIterator<Item = ServiceMessage>>(&mut self, messages: I) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn technical(&self) -> Vec<StoredMessage> {
        self.entries
            .iter()
            .filter(|entry| entry.message.technical)
            .cloned()
            .collect()
    }

    pub fn remove(&mut self, ids: &[MessageId]) {
        self.entries.retain(|entry| !ids.contains(&entry.id));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacedMessage {
    pub dialog: DialogId,
    pub text: String,
    pub consumed: usize,
}

/// Turns newly arrived technical messages into one blocking dialog at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TechnicalMessageSurfacer {
    open_dialog: Option<DialogId>,
    last_dialog: i64,
}

impl TechnicalMessageSurfacer {
    pub const fn open_dialog(self) -> Option<DialogId> {
        self.open_dialog
    }

    /// Consumes every technical message in the store and surfaces the first one.
    ///
    /// Nothing happens while a dialog is still open; the messages stay queued and are
    /// picked up by the next change after it closes.
    pub fn on_messages_changed(&mut self, store: &mut MessageStore) -> Option<SurfacedMessage> {
        if self.open_dialog.is_some() {
            return None;
        }
        let batch = store.technical();
        let first = batch.first()?.message.text.clone();

        let ids = batch.iter().map(|entry| entry.id).collect::<Vec<_>>();
        store.remove(&ids);

        self.last_dialog = self.last_dialog.saturating_add(1);
        let dialog = DialogId::new(self.last_dialog);
        self.open_dialog = Some(dialog);
        Some(SurfacedMessage {
            dialog,
            text: first,
            consumed: ids.len(),
        })
    }

    /// Returns whether `dialog` was the open one.
    pub fn close(&mut self, dialog: DialogId) -> bool {
        if self.open_dialog == Some(dialog) {
            self.open_dialog = None;
            return true;
        }
        false
    }
}
