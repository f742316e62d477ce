// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

pub const DEFAULT_AGE: i64 = 18;
pub const BATCH_GROUP: &str = "peopleGroup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonField {
    UserName,
    FirstName,
    LastName,
    Age,
}

impl PersonField {
    pub const ALL: [Self; 4] = [Self::UserName, Self::FirstName, Self::LastName, Self::Age];

    /// The field that decides whether a record is still unnamed.
    pub const KEY: Self = Self::UserName;

    /// The field the list sorts and searches by.
    pub const DISPLAY: Self = Self::LastName;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserName => "UserName",
            Self::FirstName => "FirstName",
            Self::LastName => "LastName",
            Self::Age => "Age",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "UserName" => Some(Self::UserName),
            "FirstName" => Some(Self::FirstName),
            "LastName" => Some(Self::LastName),
            "Age" => Some(Self::Age),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UserName => "user name",
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Age => "age",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
}

impl Person {
    pub fn blank() -> Self {
        Self {
            user_name: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            age: DEFAULT_AGE,
        }
    }

    pub fn get(&self, field: PersonField) -> String {
        match field {
            PersonField::UserName => self.user_name.clone(),
            PersonField::FirstName => self.first_name.clone(),
            PersonField::LastName => self.last_name.clone(),
            PersonField::Age => self.age.to_string(),
        }
    }

    pub fn is_unnamed(&self) -> bool {
        self.user_name.trim().is_empty()
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::blank()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRow {
    pub id: PersonId,
    pub person: Person,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortState {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortState {
    pub const ALL: [Self; 3] = [Self::Unsorted, Self::Ascending, Self::Descending];

    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|state| *state == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub const fn sorter(self) -> Option<Sorter> {
        match self {
            Self::Unsorted => None,
            Self::Ascending => Some(Sorter {
                field: PersonField::DISPLAY,
                descending: false,
            }),
            Self::Descending => Some(Sorter {
                field: PersonField::DISPLAY,
                descending: true,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorter {
    pub field: PersonField,
    pub descending: bool,
}

impl Sorter {
    pub fn compare(self, left: &Person, right: &Person) -> Ordering {
        let ordering = match self.field {
            PersonField::Age => left.age.cmp(&right.age),
            field => left.get(field).cmp(&right.get(field)),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchCase {
    #[default]
    Sensitive,
    Insensitive,
}

impl SearchCase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sensitive => "sensitive",
            Self::Insensitive => "insensitive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sensitive" => Some(Self::Sensitive),
            "insensitive" => Some(Self::Insensitive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterExpr {
    pub field: PersonField,
    pub needle: String,
    pub case: SearchCase,
}

impl FilterExpr {
    pub fn contains(field: PersonField, needle: impl Into<String>, case: SearchCase) -> Self {
        Self {
            field,
            needle: needle.into(),
            case,
        }
    }

    pub fn matches(&self, person: &Person) -> bool {
        let haystack = person.get(self.field);
        match self.case {
            SearchCase::Sensitive => haystack.contains(&self.needle),
            SearchCase::Insensitive => haystack
                .to_lowercase()
                .contains(&self.needle.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefreshConflict {
    #[default]
    Proceed,
    Abort,
}

impl RefreshConflict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::Abort => "abort",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "proceed" => Some(Self::Proceed),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLayout {
    pub detail_visible: bool,
    pub list_percent: u16,
    pub resizable: bool,
    pub search_percent: u16,
}

impl DetailLayout {
    pub const COLLAPSED: Self = Self {
        detail_visible: false,
        list_percent: 100,
        resizable: false,
        search_percent: 20,
    };

    pub const SPLIT: Self = Self {
        detail_visible: true,
        list_percent: 60,
        resizable: true,
        search_percent: 40,
    };

    pub const fn detail_percent(self) -> u16 {
        100 - self.list_percent
    }
}

impl Default for DetailLayout {
    fn default() -> Self {
        Self::COLLAPSED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageSeverity {
    Error,
    Warning,
    Info,
}

impl MessageSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A message pushed by the remote service outside of any request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMessage {
    pub text: String,
    pub technical: bool,
    pub severity: MessageSeverity,
    pub target: Option<PersonField>,
}

impl ServiceMessage {
    pub fn technical(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            technical: true,
            severity: MessageSeverity::Error,
            target: None,
        }
    }

    pub fn for_field(field: PersonField, text: impl Into<String>) -> Self {
        Self {
            target: Some(field),
            ..Self::technical(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub message: ServiceMessage,
}
