// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use anyhow::{Result, anyhow, bail};

use crate::{
    ContextId, FilterExpr, Person, PersonField, RecordCollection, RequestId, Sorter,
};

/// In-memory collection that records every call and never settles anything by itself;
/// tests deliver completions through `Coordinator::handle_remote`.
#[derive(Debug, Default)]
pub(crate) struct FakeCollection {
    rows: Vec<(ContextId, Person)>,
    next_context: i64,
    sorter: Option<Sorter>,
    filter: Option<FilterExpr>,
    kept_alive: BTreeSet<ContextId>,
    pub pending: bool,
    pub fail_submit: bool,
    pub submitted: Vec<(RequestId, String)>,
    pub deleted: Vec<(RequestId, ContextId)>,
    pub data_source_resets: Vec<RequestId>,
    pub refresh_count: usize,
    pub reset_count: usize,
}

impl FakeCollection {
    /// Drops a row the way a server-side delete would, without any vanish event.
    pub fn remove(&mut self, context: ContextId) {
        self.rows.retain(|(id, _)| *id != context);
    }

    pub fn with_people(user_names: &[&str]) -> Self {
        let mut collection = Self::default();
        for user_name in user_names {
            collection.push(Person {
                user_name: (*user_name).to_owned(),
                last_name: format!("{user_name}son"),
                ..Person::blank()
            });
        }
        collection
    }

    pub fn with_last_names(last_names: &[&str]) -> Self {
        let mut collection = Self::default();
        for last_name in last_names {
            collection.push(Person {
                user_name: last_name.to_lowercase(),
                last_name: (*last_name).to_owned(),
                ..Person::blank()
            });
        }
        collection
    }

    fn push(&mut self, person: Person) -> ContextId {
        self.next_context += 1;
        let context = ContextId::new(self.next_context);
        self.rows.push((context, person));
        context
    }
}

impl RecordCollection for FakeCollection {
    fn contexts(&self) -> Vec<ContextId> {
        let mut rows = self
            .rows
            .iter()
            .filter(|(_, person)| self.filter.as_ref().is_none_or(|f| f.matches(person)))
            .collect::<Vec<_>>();
        if let Some(sorter) = self.sorter {
            rows.sort_by(|(_, left), (_, right)| sorter.compare(left, right));
        }
        rows.into_iter().map(|(context, _)| *context).collect()
    }

    fn set_sorter(&mut self, sorter: Option<Sorter>) {
        self.sorter = sorter;
    }

    fn set_filter(&mut self, filter: Option<FilterExpr>) {
        self.filter = filter;
    }

    fn create_record(&mut self, initial: Person) -> Result<ContextId> {
        self.pending = true;
        Ok(self.push(initial))
    }

    fn record(&self, context: ContextId) -> Option<Person> {
        self.rows
            .iter()
            .find(|(id, _)| *id == context)
            .map(|(_, person)| person.clone())
    }

    fn set_field(&mut self, context: ContextId, field: PersonField, value: &str) -> Result<()> {
        let (_, person) = self
            .rows
            .iter_mut()
            .find(|(id, _)| *id == context)
            .ok_or_else(|| anyhow!("context {} not found", context.get()))?;
        match field {
            PersonField::UserName => person.user_name = value.to_owned(),
            PersonField::FirstName => person.first_name = value.to_owned(),
            PersonField::LastName => person.last_name = value.to_owned(),
            PersonField::Age => person.age = value.parse()?,
        }
        self.pending = true;
        Ok(())
    }

    fn has_pending_changes(&self) -> bool {
        self.pending
    }

    fn reset_changes(&mut self) -> Result<()> {
        self.reset_count += 1;
        self.pending = false;
        Ok(())
    }

    fn submit_batch(&mut self, request_id: RequestId, group: &str) -> Result<()> {
        if self.fail_submit {
            bail!("service unreachable");
        }
        self.submitted.push((request_id, group.to_owned()));
        Ok(())
    }

    fn delete(&mut self, request_id: RequestId, context: ContextId) -> Result<()> {
        self.deleted.push((request_id, context));
        self.pending = true;
        Ok(())
    }

    fn set_keep_alive(&mut self, context: ContextId, keep_alive: bool) -> Result<()> {
        if keep_alive {
            self.kept_alive.insert(context);
        } else {
            self.kept_alive.remove(&context);
        }
        Ok(())
    }

    fn is_kept_alive(&self, context: ContextId) -> bool {
        self.kept_alive.contains(&context)
    }

    fn refresh(&mut self) -> Result<()> {
        self.refresh_count += 1;
        Ok(())
    }

    fn reset_data_source(&mut self, request_id: RequestId) -> Result<()> {
        self.data_source_resets.push(request_id);
        Ok(())
    }
}
