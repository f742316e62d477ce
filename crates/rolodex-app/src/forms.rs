// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

use crate::PersonField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldInputError {
    #[error("age must be a whole number, got {0:?}")]
    InvalidAge(String),
}

/// Normalizes raw detail-pane input for `field` before it reaches the collection.
///
/// Only type checks happen here; range and uniqueness rules belong to the service and
/// come back as technical messages.
pub fn normalize_input(field: PersonField, raw: &str) -> Result<String, FieldInputError> {
    match field {
        PersonField::Age => {
            let trimmed = raw.trim();
            trimmed
                .parse::<i64>()
                .map(|age| age.to_string())
                .map_err(|_| FieldInputError::InvalidAge(raw.to_owned()))
        }
        PersonField::UserName | PersonField::FirstName | PersonField::LastName => {
            Ok(raw.to_owned())
        }
    }
}
