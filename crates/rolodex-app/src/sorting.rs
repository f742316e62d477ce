// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    FilterExpr, PersonField, RecordCollection, SearchCase, SortState, TextCatalog, TextKey,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    sort: SortState,
    search: String,
    case: SearchCase,
}

impl ListQuery {
    pub fn new(case: SearchCase) -> Self {
        Self {
            case,
            ..Self::default()
        }
    }

    pub const fn sort(&self) -> SortState {
        self.sort
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn cycle_sort<C: RecordCollection + ?Sized>(&mut self, collection: &mut C) -> SortState {
        self.sort = self.sort.next();
        collection.set_sorter(self.sort.sorter());
        self.sort
    }

    pub fn search<C: RecordCollection + ?Sized>(&mut self, collection: &mut C, needle: &str) {
        self.search = needle.to_owned();
        let filter = (!needle.is_empty())
            .then(|| FilterExpr::contains(PersonField::DISPLAY, needle, self.case));
        collection.set_filter(filter);
    }
}

pub fn sort_label(texts: &TextCatalog, state: SortState) -> String {
    let key = match state {
        SortState::Unsorted => TextKey::SortNone,
        SortState::Ascending => TextKey::SortAscending,
        SortState::Descending => TextKey::SortDescending,
    };
    texts.text(key)
}
