// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{RecordCollection, UiState};

/// Derives `has_ui_changes` from the collection plus the sticky technical-error flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingChangeLedger {
    technical_errors: bool,
}

impl PendingChangeLedger {
    pub const fn technical_errors(self) -> bool {
        self.technical_errors
    }

    pub fn mark_technical_error(&mut self) {
        self.technical_errors = true;
    }

    pub fn clear_technical_error(&mut self) {
        self.technical_errors = false;
    }

    /// `None` asks the collection; `Some` is taken as-is. Either way an unresolved
    /// technical error wins.
    pub fn recompute<C: RecordCollection + ?Sized>(
        &self,
        ui: &mut UiState,
        collection: &C,
        explicit: Option<bool>,
    ) -> bool {
        let dirty = if self.technical_errors {
            true
        } else {
            match explicit {
                Some(value) => value,
                None => collection.has_pending_changes(),
            }
        };
        ui.has_ui_changes = dirty;
        dirty
    }
}
