// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::warn;

use crate::{ContextId, DetailLayout, RecordCollection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailPane {
    pub context: Option<ContextId>,
    pub layout: DetailLayout,
}

/// Owns the single keep-alive pin backing the detail pane.
///
/// `pane` is `None` while the view is torn down; selection changes are then ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLifecycle {
    pane: Option<DetailPane>,
}

impl Default for DetailLifecycle {
    fn default() -> Self {
        Self {
            pane: Some(DetailPane::default()),
        }
    }
}

impl DetailLifecycle {
    pub fn pinned(&self) -> Option<ContextId> {
        self.pane.and_then(|pane| pane.context)
    }

    pub fn layout(&self) -> DetailLayout {
        self.pane.map(|pane| pane.layout).unwrap_or_default()
    }

    pub fn detach(&mut self) {
        self.pane = None;
    }

    /// Returns the new pane state, or `None` when there is no pane to update.
    pub fn select<C: RecordCollection + ?Sized>(
        &mut self,
        collection: &mut C,
        context: Option<ContextId>,
    ) -> Option<DetailPane> {
        let pane = self.pane.as_mut()?;

        if let Some(previous) = pane.context.take()
            && let Err(error) = collection.set_keep_alive(previous, false)
        {
            warn!(context = previous.get(), "release keep-alive failed: {error:#}");
        }

        let mut bound = None;
        if let Some(next) = context {
            match collection.set_keep_alive(next, true) {
                Ok(()) => bound = Some(next),
                Err(error) => {
                    warn!(context = next.get(), "keep-alive pin failed: {error:#}");
                }
            }
        }

        pane.context = bound;
        pane.layout = if bound.is_some() {
            DetailLayout::SPLIT
        } else {
            DetailLayout::COLLAPSED
        };
        Some(*pane)
    }

    /// Collapses the pane when the vanished context is the pinned one.
    pub fn handle_vanished<C: RecordCollection + ?Sized>(
        &mut self,
        collection: &mut C,
        context: ContextId,
    ) -> Option<DetailPane> {
        if self.pinned() != Some(context) {
            return None;
        }
        self.select(collection, None)
    }
}
