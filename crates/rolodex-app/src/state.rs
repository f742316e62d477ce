// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ContextId, DetailLayout, DialogId, PersonField, SortState};

/// Flags the view binds its save/reset/search/sort affordances to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub busy: bool,
    pub has_ui_changes: bool,
    pub user_name_empty: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            busy: false,
            has_ui_changes: false,
            user_name_empty: true,
        }
    }
}

impl UiState {
    /// Search and sort stay disabled while there is uncommitted work.
    pub const fn list_controls_enabled(self) -> bool {
        !self.has_ui_changes && !self.busy
    }

    pub const fn save_enabled(self) -> bool {
        self.has_ui_changes && !self.user_name_empty && !self.busy
    }

    pub const fn reset_enabled(self) -> bool {
        self.has_ui_changes && !self.busy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
    /// Blocking dialog for a technical service message; the view reports its closing.
    ServiceError { dialog: DialogId, text: String },
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Info(text) | Self::Error(text) => text,
            Self::ServiceError { text, .. } => text,
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_) | Self::ServiceError { .. })
    }

    pub const fn is_blocking(&self) -> bool {
        self.is_error()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Create,
    Save,
    Delete,
    ResetChanges,
    Refresh,
    ResetDataSource,
    CycleSort,
    Search(String),
    SelectItem(Option<ContextId>),
    EditField {
        context: ContextId,
        field: PersonField,
        value: String,
    },
    CancelInput,
    CloseDialog(DialogId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    UiStateChanged(UiState),
    Notified(Notice),
    ListSelectionChanged(Option<ContextId>),
    DetailChanged(Option<ContextId>),
    LayoutChanged(DetailLayout),
    SortChanged(SortState),
    FilterChanged(String),
    FocusRequested(ContextId),
    DialogClosed(DialogId),
}

impl AppEvent {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Notified(notice) => Some(notice),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppEvent, Notice, UiState};
    use crate::DialogId;

    #[test]
    fn fresh_state_has_no_changes_and_an_unnamed_user() {
        let state = UiState::default();
        assert!(!state.busy);
        assert!(!state.has_ui_changes);
        assert!(state.user_name_empty);
        assert!(state.list_controls_enabled());
        assert!(!state.save_enabled());
    }

    #[test]
    fn pending_changes_lock_list_controls() {
        let state = UiState {
            has_ui_changes: true,
            user_name_empty: false,
            busy: false,
        };
        assert!(!state.list_controls_enabled());
        assert!(state.save_enabled());
        assert!(state.reset_enabled());

        let busy = UiState {
            busy: true,
            ..state
        };
        assert!(!busy.save_enabled());
        assert!(!busy.reset_enabled());
    }

    #[test]
    fn service_errors_are_blocking() {
        let notice = Notice::ServiceError {
            dialog: DialogId::new(1),
            text: "UserName must be unique".to_owned(),
        };
        assert!(notice.is_blocking());
        assert_eq!(notice.text(), "UserName must be unique");
        assert!(!Notice::Info("sorted".to_owned()).is_error());
        assert_eq!(
            AppEvent::Notified(notice.clone()).notice(),
            Some(&notice)
        );
    }
}
