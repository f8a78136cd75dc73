//! Example concrete task, exercised in tests: a file copy/move operation
//! with the state graph named in §4.7:
//!
//! `IDLE -> CONFIRMING -> CHECKING -> RESOLVING (self) -> EXECUTING ->
//! COMPLETED -> IDLE`, with cancel from any active state back to IDLE.

use crate::{Task, TaskState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOpKind {
    Copy,
    Move,
    Delete,
}

/// One unresolved naming conflict between a source file and an existing
/// destination entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub source: String,
    pub resolution: Option<ConflictResolution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Overwrite,
    Skip,
    Rename,
}

/// Operation kind, file list, destination, conflicts, and results — cleared
/// whenever the task returns to IDLE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOpContext {
    pub kind: FileOpKind,
    pub files: Vec<String>,
    pub destination: String,
    pub conflicts: Vec<Conflict>,
    pub results: Vec<String>,
}

impl FileOpContext {
    pub fn new(kind: FileOpKind, files: Vec<String>, destination: String) -> Self {
        FileOpContext { kind, files, destination, conflicts: Vec::new(), results: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOpState {
    Idle,
    Confirming,
    Checking,
    Resolving,
    Executing,
    Completed,
}

impl TaskState for FileOpState {
    fn is_idle(&self) -> bool {
        matches!(self, FileOpState::Idle)
    }
    fn is_completed(&self) -> bool {
        matches!(self, FileOpState::Completed)
    }
}

pub struct FileOpTask {
    state: FileOpState,
    context: Option<FileOpContext>,
}

impl FileOpTask {
    pub fn new(context: FileOpContext) -> Self {
        FileOpTask { state: FileOpState::Idle, context: Some(context) }
    }

    pub fn context(&self) -> Option<&FileOpContext> {
        self.context.as_ref()
    }

    /// CONFIRMING -> CHECKING, once the user has confirmed the operation.
    pub fn confirm(&mut self) {
        if self.state == FileOpState::Confirming {
            self.state = FileOpState::Checking;
        }
    }

    /// CHECKING -> RESOLVING if conflicts were found, else straight to
    /// EXECUTING.
    pub fn finish_checking(&mut self) {
        if self.state != FileOpState::Checking {
            return;
        }
        let has_conflicts =
            self.context.as_ref().is_some_and(|c| !c.conflicts.is_empty());
        self.state = if has_conflicts { FileOpState::Resolving } else { FileOpState::Executing };
    }

    /// RESOLVING self-loops while conflicts remain unresolved; records one
    /// resolution per call and advances to EXECUTING once all are resolved.
    pub fn resolve_one(&mut self, resolution: ConflictResolution) {
        if self.state != FileOpState::Resolving {
            return;
        }
        if let Some(ctx) = &mut self.context
            && let Some(conflict) = ctx.conflicts.iter_mut().find(|c| c.resolution.is_none())
        {
            conflict.resolution = Some(resolution);
        }
    }

    /// Advances out of RESOLVING once every conflict carries a resolution.
    pub fn finish_resolving(&mut self) {
        if self.state != FileOpState::Resolving {
            return;
        }
        let all_resolved =
            self.context.as_ref().is_none_or(|c| c.conflicts.iter().all(|c| c.resolution.is_some()));
        if all_resolved {
            self.state = FileOpState::Executing;
        }
    }

    /// EXECUTING -> COMPLETED, recording the final result list.
    pub fn finish_executing(&mut self) {
        if self.state == FileOpState::Executing {
            self.state = FileOpState::Completed;
        }
    }
}

impl Task for FileOpTask {
    type State = FileOpState;

    fn start(&mut self) {
        if self.state == FileOpState::Idle {
            self.state = FileOpState::Confirming;
        }
    }

    fn cancel(&mut self) {
        self.state = FileOpState::Idle;
        self.context = None;
    }

    fn state(&self) -> Self::State {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_conflict() -> FileOpTask {
        let mut ctx = FileOpContext::new(FileOpKind::Copy, vec!["a.txt".into()], "dest".into());
        ctx.conflicts.push(Conflict { source: "a.txt".into(), resolution: None });
        FileOpTask::new(ctx)
    }

    #[test]
    fn no_conflict_path_skips_resolving() {
        let mut task = FileOpTask::new(FileOpContext::new(FileOpKind::Move, vec!["a".into()], "b".into()));
        task.start();
        task.confirm();
        task.finish_checking();
        assert_eq!(task.state(), FileOpState::Executing);
    }

    #[test]
    fn conflict_path_enters_resolving_and_self_loops() {
        let mut task = task_with_conflict();
        task.start();
        task.confirm();
        task.finish_checking();
        assert_eq!(task.state(), FileOpState::Resolving);
        task.finish_resolving();
        assert_eq!(task.state(), FileOpState::Resolving, "unresolved conflict keeps it in place");
        task.resolve_one(ConflictResolution::Overwrite);
        task.finish_resolving();
        assert_eq!(task.state(), FileOpState::Executing);
    }

    #[test]
    fn full_transition_graph_reaches_completed() {
        let mut task = FileOpTask::new(FileOpContext::new(FileOpKind::Delete, vec!["a".into()], "".into()));
        task.start();
        task.confirm();
        task.finish_checking();
        task.finish_executing();
        assert_eq!(task.state(), FileOpState::Completed);
        assert!(!task.is_active());
    }

    #[test]
    fn cancel_clears_context_and_ignores_further_input() {
        let mut task = task_with_conflict();
        task.start();
        task.confirm();
        task.cancel();
        assert_eq!(task.state(), FileOpState::Idle);
        assert!(task.context().is_none());
        task.finish_checking();
        assert_eq!(task.state(), FileOpState::Idle);
    }
}
