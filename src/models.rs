#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            completed: false,
        }
    }

    /// Copy of this task with the completion flag inverted.
    pub fn toggled(&self) -> Self {
        Task {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupMode {
    None,
    AddTask,
    Settings,
}
