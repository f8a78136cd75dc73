use thiserror::Error;

use crate::Task;

/// The sole place in the ambient stack where an invariant violation produces
/// an explicit error return (§7): starting a second task while one is
/// already active.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("a task is already active")]
    AlreadyActive,
}

/// Holds at most one active task for its owning context (invariant #6).
/// Cleared automatically once the held task reaches its COMPLETED state.
#[derive(Default)]
pub struct TaskSlot<T: Task> {
    current: Option<T>,
}

impl<T: Task> TaskSlot<T> {
    pub fn new() -> Self {
        TaskSlot { current: None }
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current.as_mut()
    }

    /// Starts `task`, failing with [`TaskError::AlreadyActive`] if a task in
    /// this slot is already active. Replacing an idle-or-completed leftover
    /// task is allowed — it is equivalent to the slot being empty.
    pub fn start(&mut self, mut task: T) -> Result<(), TaskError> {
        if self.current.as_ref().is_some_and(Task::is_active) {
            tracing::warn!(target: "ttk::task", "rejected start: a task is already active");
            return Err(TaskError::AlreadyActive);
        }
        task.start();
        self.current = Some(task);
        Ok(())
    }

    /// Cancels the held task, if any, and clears the slot. A no-op on an
    /// empty slot.
    pub fn cancel(&mut self) {
        if let Some(task) = self.current.as_mut() {
            task.cancel();
        }
        self.current = None;
    }

    /// Clears the slot if the held task has reached COMPLETED. Call this at
    /// the top of each UI tick so a finished task does not linger and block
    /// the next `start`.
    pub fn reap_completed(&mut self) {
        if let Some(task) = &self.current
            && task.state().is_completed()
        {
            self.current = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(Task::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_op::{FileOpContext, FileOpKind, FileOpState, FileOpTask};

    fn task() -> FileOpTask {
        FileOpTask::new(FileOpContext::new(FileOpKind::Copy, vec!["a".into()], "b".into()))
    }

    #[test]
    fn starting_a_second_task_while_active_is_rejected() {
        let mut slot = TaskSlot::new();
        slot.start(task()).unwrap();
        assert_eq!(slot.start(task()), Err(TaskError::AlreadyActive));
    }

    #[test]
    fn starting_after_completion_succeeds() {
        let mut slot = TaskSlot::new();
        slot.start(task()).unwrap();
        slot.current_mut().unwrap().confirm();
        slot.current_mut().unwrap().finish_checking();
        slot.current_mut().unwrap().finish_resolving();
        slot.current_mut().unwrap().finish_executing();
        assert_eq!(slot.current().unwrap().state(), FileOpState::Completed);
        slot.reap_completed();
        assert!(slot.current().is_none());
        assert!(slot.start(task()).is_ok());
    }

    #[test]
    fn cancel_clears_the_slot() {
        let mut slot = TaskSlot::new();
        slot.start(task()).unwrap();
        slot.cancel();
        assert!(slot.current().is_none());
        assert!(!slot.is_active());
    }
}
