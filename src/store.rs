use crate::models::Task;

/// Ordered, in-memory task collection.
///
/// Insertion order is display order. Every effective mutation bumps
/// `revision`, which the UI polls to know the list changed; no-ops leave it
/// untouched.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a task with the next free id.
    ///
    /// Blank titles are ignored and `None` is returned.
    pub fn add_task(&mut self, title: &str) -> Option<&Task> {
        if title.trim().is_empty() {
            log::debug!("ignoring task with blank title");
            return None;
        }

        let id = self.next_id();
        self.tasks.push(Task::new(id, title));
        self.revision += 1;
        log::info!("added task {} ({:?})", id, title);
        self.tasks.last()
    }

    /// Flip the completion flag of the first task with `id`.
    ///
    /// Unknown ids are ignored and `None` is returned.
    pub fn toggle_task_completion(&mut self, id: u32) -> Option<&Task> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            log::debug!("toggle for unknown task id {}", id);
            return None;
        };

        self.tasks[index] = self.tasks[index].toggled();
        self.revision += 1;

        let task = self.get(id);
        if let Some(task) = task {
            log::info!(
                "task {} marked {}",
                id,
                if task.completed { "done" } else { "open" }
            );
        }
        task
    }

    fn next_id(&self) -> u32 {
        self.tasks.iter().map(|task| task.id).max().map_or(1, |max| max + 1)
    }
}
