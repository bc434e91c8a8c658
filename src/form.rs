use crate::idea::{FIELD_COUNT, FIELDS, FieldKey, FieldSpec, IdeaDraft};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the form asks the app to do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// User asked to submit the current values
    Submit,
    /// User closed the form, discarding input
    Cancel,
}

/// Submission form state: one value per schema field plus focus.
#[derive(Debug, Clone, Default)]
pub struct IdeaForm {
    draft: IdeaDraft,
    focus: usize,

    /// An insert for this form is in flight
    pub submitting: bool,

    /// Validation or insert error shown under the fields
    pub error: Option<String>,
}

impl IdeaForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &IdeaDraft {
        &self.draft
    }

    pub fn focused(&self) -> FieldSpec {
        FIELDS[self.focus]
    }

    pub fn focus(&mut self, key: FieldKey) {
        self.focus = key.index();
    }

    /// Clear every value, focus and error.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        if key.code == KeyCode::Esc {
            return Some(FormAction::Cancel);
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(FormAction::Submit);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_field();
                return None;
            }
            _ => {}
        }

        // Values are frozen while the insert is in flight.
        if self.submitting {
            return None;
        }

        let spec = self.focused();
        match key.code {
            KeyCode::Enter if spec.multiline => {
                self.draft.get_mut(spec.key).push('\n');
            }
            KeyCode::Enter => self.next_field(),
            KeyCode::Backspace => {
                self.draft.get_mut(spec.key).pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.draft.get_mut(spec.key).push(c);
                self.error = None;
            }
            _ => {}
        }
        None
    }
}
