// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextKey {
    ChangesSent,
    DeletionSuccess,
    DeletionRestored,
    DeleteFailed,
    RefreshNotPossible,
    RefreshSuccess,
    SourceResetSuccess,
    SortMessage,
    SortNone,
    SortAscending,
    SortDescending,
    AgeInvalid,
}

impl TextKey {
    pub const ALL: [Self; 12] = [
        Self::ChangesSent,
        Self::DeletionSuccess,
        Self::DeletionRestored,
        Self::DeleteFailed,
        Self::RefreshNotPossible,
        Self::RefreshSuccess,
        Self::SourceResetSuccess,
        Self::SortMessage,
        Self::SortNone,
        Self::SortAscending,
        Self::SortDescending,
        Self::AgeInvalid,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChangesSent => "changesSentMessage",
            Self::DeletionSuccess => "deletionSuccessMessage",
            Self::DeletionRestored => "deletionRestoredMessage",
            Self::DeleteFailed => "deleteFailedMessage",
            Self::RefreshNotPossible => "refreshNotPossibleMessage",
            Self::RefreshSuccess => "refreshSuccessMessage",
            Self::SourceResetSuccess => "sourceResetSuccessMessage",
            Self::SortMessage => "sortMessage",
            Self::SortNone => "sortNone",
            Self::SortAscending => "sortAscending",
            Self::SortDescending => "sortDescending",
            Self::AgeInvalid => "ageInvalidMessage",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub const fn default_template(self) -> &'static str {
        match self {
            Self::ChangesSent => "Changes have been sent",
            Self::DeletionSuccess => "User {0} deleted",
            Self::DeletionRestored => "Deletion of user {0} was reverted",
            Self::DeleteFailed => "{0}: {1}",
            Self::RefreshNotPossible => {
                "Refresh not possible while there are unsaved changes; save or reset them first"
            }
            Self::RefreshSuccess => "Data refreshed",
            Self::SourceResetSuccess => "Data source restored",
            Self::SortMessage => "Sorting: {0}",
            Self::SortNone => "none",
            Self::SortAscending => "ascending",
            Self::SortDescending => "descending",
            Self::AgeInvalid => "Age must be a whole number, got {0:?}",
        }
    }
}

/// Localized message templates with `{N}` positional placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextCatalog {
    overrides: BTreeMap<TextKey, String>,
}

impl TextCatalog {
    pub fn with_overrides<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut overrides = BTreeMap::new();
        for (raw_key, template) in entries {
            let Some(key) = TextKey::parse(raw_key) else {
                bail!(
                    "unknown text key {raw_key:?}; known keys: {}",
                    TextKey::ALL
                        .iter()
                        .map(|key| key.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            };
            overrides.insert(key, template.to_owned());
        }
        Ok(Self { overrides })
    }

    pub fn template(&self, key: TextKey) -> &str {
        self.overrides
            .get(&key)
            .map_or_else(|| key.default_template(), String::as_str)
    }

    pub fn text(&self, key: TextKey) -> String {
        self.template(key).to_owned()
    }

    /// Fills `{N}` and `{N:?}` placeholders in one pass over the template, so argument
    /// text is never rescanned. Unknown or malformed placeholders are kept verbatim.
    pub fn format(&self, key: TextKey, args: &[&str]) -> String {
        let template = self.template(key);
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                rendered.push_str(&rest[open..]);
                return rendered;
            };
            let spec = &after[..close];
            let (index, debug) = match spec.strip_suffix(":?") {
                Some(index) => (index, true),
                None => (spec, false),
            };
            match index.parse::<usize>().ok().and_then(|index| args.get(index)) {
                Some(arg) if debug => rendered.push_str(&format!("{arg:?}")),
                Some(arg) => rendered.push_str(arg),
                None => rendered.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }
        rendered.push_str(rest);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::{TextCatalog, TextKey};

    #[test]
    fn defaults_fill_positional_arguments() {
        let catalog = TextCatalog::default();
        assert_eq!(
            catalog.format(TextKey::DeletionSuccess, &["russellwhyte"]),
            "User russellwhyte deleted"
        );
        assert_eq!(
            catalog.format(TextKey::AgeInvalid, &["ten"]),
            "Age must be a whole number, got \"ten\""
        );
    }

    #[test]
    fn argument_text_is_not_rescanned_for_placeholders() {
        let catalog = TextCatalog::default();
        assert_eq!(
            catalog.format(TextKey::DeleteFailed, &["row {1} is locked", "javieralfred"]),
            "row {1} is locked: javieralfred"
        );
    }

    #[test]
    fn missing_arguments_leave_placeholders_in_place() {
        let catalog = TextCatalog::default();
        assert_eq!(catalog.format(TextKey::DeleteFailed, &["gone"]), "gone: {1}");
    }

    #[test]
    fn overrides_replace_default_templates() -> anyhow::Result<()> {
        let catalog = TextCatalog::with_overrides([("sortMessage", "Tri : {0}")])?;
        assert_eq!(catalog.format(TextKey::SortMessage, &["aucun"]), "Tri : aucun");
        assert_eq!(catalog.text(TextKey::SortNone), "none");
        Ok(())
    }

    #[test]
    fn unknown_override_key_is_rejected() {
        let error = TextCatalog::with_overrides([("sortMesage", "x")])
            .expect_err("typo in key should fail");
        let message = error.to_string();
        assert!(message.contains("unknown text key"));
        assert!(message.contains("sortMessage"));
    }

    #[test]
    fn every_key_round_trips_through_its_resource_name() {
        for key in TextKey::ALL {
            assert_eq!(TextKey::parse(key.as_str()), Some(key));
        }
    }
}
