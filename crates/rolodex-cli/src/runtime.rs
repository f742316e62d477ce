// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rolodex_app::{Coordinator, CoordinatorSettings, RemoteEvent, TextCatalog};
use rolodex_db::{DbCollection, Store};
use rolodex_tui::ViewOptions;
use std::sync::mpsc::{self, Receiver};
use tracing::info;

/// One editing session: the coordinator over the database-backed collection plus the
/// channel its completions arrive on.
pub struct Session {
    coordinator: Coordinator<DbCollection>,
    remote_rx: Receiver<RemoteEvent>,
}

impl Session {
    pub fn open(store: Store, texts: TextCatalog, settings: CoordinatorSettings) -> Result<Self> {
        let (remote_tx, remote_rx) = mpsc::channel();
        let collection =
            DbCollection::new(store, remote_tx).context("load people into the session")?;
        info!(
            people = collection.store().person_count()?,
            search_case = settings.search_case.as_str(),
            refresh_conflict = settings.refresh_conflict.as_str(),
            "session opened"
        );
        Ok(Self {
            coordinator: Coordinator::new(collection, texts, settings),
            remote_rx,
        })
    }

    pub fn run(mut self, options: ViewOptions) -> Result<()> {
        rolodex_tui::run_app(&mut self.coordinator, &self.remote_rx, options)
    }

    #[cfg(test)]
    fn coordinator(&self) -> &Coordinator<DbCollection> {
        &self.coordinator
    }
}
