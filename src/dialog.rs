use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::input::LineInput;
use crate::store::TaskStore;

pub const ADD_TASK_TITLE: &str = "New Task";
pub const ADD_TASK_LABEL: &str = "Task Title";
pub const BLANK_TITLE_HINT: &str = "Title cannot be blank";
pub const SETTINGS_TITLE: &str = "Settings";
pub const SETTINGS_BODY: &str = "Customize your NeonPulse experience here.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Open,
    Closed,
}

/// Ephemeral state of the "New Task" overlay.
#[derive(Debug, Default)]
pub struct AddTaskDialog {
    pub visible: bool,
    pub input: LineInput,
    pub hint: Option<&'static str>,
}

impl AddTaskDialog {
    pub fn open(&mut self) {
        self.visible = true;
        self.input.clear();
        self.hint = None;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.input.clear();
        self.hint = None;
    }

    /// Add the typed title to `store` and close, unless the title is blank.
    pub fn confirm(&mut self, store: &mut TaskStore) -> DialogOutcome {
        if self.input.is_blank() {
            self.hint = Some(BLANK_TITLE_HINT);
            return DialogOutcome::Open;
        }

        store.add_task(self.input.value());
        self.close();
        DialogOutcome::Closed
    }

    pub fn handle_key(&mut self, key: KeyEvent, store: &mut TaskStore) -> DialogOutcome {
        match key.code {
            KeyCode::Esc => {
                self.close();
                return DialogOutcome::Closed;
            }
            KeyCode::Enter => return self.confirm(store),
            KeyCode::Char(c) => {
                // Chords are shortcuts, not text.
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    return DialogOutcome::Open;
                }
                self.input.insert_char(c);
            }
            KeyCode::Backspace => self.input.delete_char(),
            KeyCode::Delete => self.input.delete_char_forward(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_to_start(),
            KeyCode::End => self.input.move_to_end(),
            _ => {}
        }
        self.hint = None;
        DialogOutcome::Open
    }
}

/// Static informational overlay with a single dismiss action.
#[derive(Debug, Default)]
pub struct SettingsDialog {
    pub visible: bool,
}

impl SettingsDialog {
    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('s') => {
                self.close();
                DialogOutcome::Closed
            }
            _ => DialogOutcome::Open,
        }
    }
}
