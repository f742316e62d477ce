// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rolodex_app::{Person, PersonField, ServiceMessage};
use thiserror::Error;

pub const USER_NAME_MAX_LEN: usize = 40;
pub const NAME_MAX_LEN: usize = 64;
pub const AGE_MIN: i64 = 0;
pub const AGE_MAX: i64 = 150;

/// A rule the service enforces on every row of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("UserName must not be empty")]
    MissingUserName,
    #[error("UserName {0:?} must not contain whitespace")]
    UserNameWhitespace(String),
    #[error("UserName {user_name:?} is longer than {max} characters")]
    UserNameTooLong { user_name: String, max: usize },
    #[error("UserName {0:?} already exists")]
    DuplicateUserName(String),
    #[error("{} is longer than {max} characters", .field.as_str())]
    NameTooLong { field: PersonField, max: usize },
    #[error("Age {age} is outside {min}..={max}")]
    AgeOutOfRange { age: i64, min: i64, max: i64 },
}

impl ValidationError {
    pub const fn field(&self) -> PersonField {
        match self {
            Self::MissingUserName
            | Self::UserNameWhitespace(_)
            | Self::UserNameTooLong { .. }
            | Self::DuplicateUserName(_) => PersonField::UserName,
            Self::NameTooLong { field, .. } => *field,
            Self::AgeOutOfRange { .. } => PersonField::Age,
        }
    }

    pub fn to_message(&self) -> ServiceMessage {
        ServiceMessage::for_field(self.field(), self.to_string())
    }
}

/// Checks the row-local rules. Uniqueness needs the table and is checked by the store.
pub fn validate_person(person: &Person) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let user_name = person.user_name.as_str();
    if user_name.trim().is_empty() {
        errors.push(ValidationError::MissingUserName);
    } else if user_name.chars().any(char::is_whitespace) {
        errors.push(ValidationError::UserNameWhitespace(user_name.to_owned()));
    }
    if user_name.chars().count() > USER_NAME_MAX_LEN {
        errors.push(ValidationError::UserNameTooLong {
            user_name: user_name.to_owned(),
            max: USER_NAME_MAX_LEN,
        });
    }

    for (field, value) in [
        (PersonField::FirstName, &person.first_name),
        (PersonField::LastName, &person.last_name),
    ] {
        if value.chars().count() > NAME_MAX_LEN {
            errors.push(ValidationError::NameTooLong {
                field,
                max: NAME_MAX_LEN,
            });
        }
    }

    if !(AGE_MIN..=AGE_MAX).contains(&person.age) {
        errors.push(ValidationError::AgeOutOfRange {
            age: person.age,
            min: AGE_MIN,
            max: AGE_MAX,
        });
    }

    errors
}
