//! In-place editing of a task's text.
//!
//! The client swaps a task's label for a text input and feeds keyboard and
//! focus events into an [`InlineEdit`]. The returned [`EditOutcome`] tells it
//! whether to send an update, put the original text back, or keep editing.
use crate::task::TaskText;

/// Keys that have a meaning while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Leave edit mode and save the new text.
    Commit(TaskText),
    /// Leave edit mode showing the original text; nothing is sent.
    Revert,
    /// Stay in edit mode.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEdit {
    original: String,
    draft: String,
}

impl InlineEdit {
    /// Starts editing with the input pre-filled with the current text.
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            draft: original.clone(),
            original,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    fn is_changed(&self) -> bool {
        self.draft.trim() != self.original
    }

    /// Enter finishes the edit only when the text actually changed.
    pub fn on_key(&self, key: EditKey) -> EditOutcome {
        match key {
            EditKey::Enter if self.is_changed() => self.finish(),
            EditKey::Escape => EditOutcome::Revert,
            _ => EditOutcome::Continue,
        }
    }

    /// Losing focus always ends the edit.
    pub fn on_blur(&self) -> EditOutcome {
        self.finish()
    }

    fn finish(&self) -> EditOutcome {
        if !self.is_changed() {
            return EditOutcome::Revert;
        }
        match TaskText::parse(&self.draft) {
            Ok(text) => EditOutcome::Commit(text),
            // Empty edits are dropped silently.
            Err(_) => EditOutcome::Revert,
        }
    }
}
