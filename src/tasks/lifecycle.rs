use time::OffsetDateTime;

use crate::error::ApiError;
use crate::tasks::dto::TaskUpdate;
use crate::tasks::repo::Task;

use serde::{Deserialize, Serialize};

/// Task status with fixed transition rules. `Done` is not terminal; a done
/// task can be reopened back to `Todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Wire/storage name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    /// Legal next statuses from this one.
    pub fn allowed_transitions(self) -> &'static [TaskStatus] {
        match self {
            TaskStatus::Todo => &[TaskStatus::InProgress],
            TaskStatus::InProgress => &[TaskStatus::Review, TaskStatus::Todo],
            TaskStatus::Review => &[TaskStatus::Done, TaskStatus::InProgress],
            TaskStatus::Done => &[TaskStatus::Todo],
        }
    }

    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Task {
    /// Apply a status transition against the fixed table. Only `status` and
    /// `updated_at` change on success.
    pub fn transition(&self, requested: TaskStatus, now: OffsetDateTime) -> Result<Task, ApiError> {
        if requested == self.status {
            return Err(ApiError::NoOpTransition {
                status: self.status.as_str().into(),
            });
        }
        let allowed = self.status.allowed_transitions();
        if !allowed.contains(&requested) {
            return Err(ApiError::IllegalTransition {
                from: self.status.as_str().into(),
                to: requested.as_str().into(),
                allowed: allowed.iter().map(|s| s.as_str().into()).collect(),
            });
        }
        let mut next = self.clone();
        next.status = requested;
        next.updated_at = now;
        Ok(next)
    }

    /// Add logged minutes. Independent of status; reopening a task never
    /// resets the accumulated total.
    pub fn log_time(&self, minutes: i32, now: OffsetDateTime) -> Result<Task, ApiError> {
        if minutes <= 0 {
            return Err(ApiError::InvalidArgument(
                "Logged minutes must be positive".into(),
            ));
        }
        let total = self.total_minutes.checked_add(minutes).ok_or_else(|| {
            ApiError::InvalidArgument("Total minutes would overflow".into())
        })?;
        let mut next = self.clone();
        next.total_minutes = total;
        next.updated_at = now;
        Ok(next)
    }

    /// Apply a partial field update. Absent fields stay untouched; status is
    /// never changed through this path.
    pub fn apply_update(&self, update: &TaskUpdate, now: OffsetDateTime) -> Task {
        let mut next = self.clone();
        if let Some(title) = &update.title {
            next.title = title.clone();
        }
        if let Some(description) = &update.description {
            next.description = Some(description.clone());
        }
        if let Some(assignee_id) = update.assignee_id {
            next.assignee_id = Some(assignee_id);
        }
        if let Some(total_minutes) = update.total_minutes {
            next.total_minutes = total_minutes;
        }
        next.updated_at = now;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(status: TaskStatus) -> Task {
        Task {
            id: 1,
            title: "Write spec".into(),
            description: None,
            status,
            total_minutes: 0,
            assignee_id: None,
            created_by: 1,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + time::Duration::days(1)
    }

    #[test]
    fn transition_table_is_exhaustive() {
        // For all 4x4 (from, to) pairs: equal pairs are no-ops, listed pairs
        // succeed, everything else is illegal.
        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                let task = sample_task(from);
                let result = task.transition(to, now());
                if from == to {
                    assert!(
                        matches!(result, Err(ApiError::NoOpTransition { .. })),
                        "{from} -> {to} should be a no-op"
                    );
                } else if from.allowed_transitions().contains(&to) {
                    let next = result.unwrap_or_else(|_| panic!("{from} -> {to} should succeed"));
                    assert_eq!(next.status, to);
                } else {
                    assert!(
                        matches!(result, Err(ApiError::IllegalTransition { .. })),
                        "{from} -> {to} should be illegal"
                    );
                }
            }
        }
    }

    #[test]
    fn allowed_sets_match_the_design_table() {
        assert_eq!(
            TaskStatus::Todo.allowed_transitions(),
            &[TaskStatus::InProgress]
        );
        assert_eq!(
            TaskStatus::InProgress.allowed_transitions(),
            &[TaskStatus::Review, TaskStatus::Todo]
        );
        assert_eq!(
            TaskStatus::Review.allowed_transitions(),
            &[TaskStatus::Done, TaskStatus::InProgress]
        );
        assert_eq!(TaskStatus::Done.allowed_transitions(), &[TaskStatus::Todo]);
    }

    #[test]
    fn transition_changes_only_status_and_updated_at() {
        let task = sample_task(TaskStatus::Todo);
        let next = task.transition(TaskStatus::InProgress, now()).unwrap();
        assert_eq!(next.status, TaskStatus::InProgress);
        assert_eq!(next.updated_at, now());
        assert_eq!(next.title, task.title);
        assert_eq!(next.total_minutes, task.total_minutes);
        assert_eq!(next.created_at, task.created_at);
    }

    #[test]
    fn illegal_transition_error_enumerates_allowed_set() {
        let task = sample_task(TaskStatus::Todo);
        let err = task.transition(TaskStatus::Done, now()).unwrap_err();
        match err {
            ApiError::IllegalTransition { from, to, allowed } => {
                assert_eq!(from, "todo");
                assert_eq!(to, "done");
                assert_eq!(allowed, vec!["in_progress".to_string()]);
            }
            other => panic!("expected IllegalTransition, got {other:?}"),
        }
    }

    #[test]
    fn full_lifecycle_with_reopen() {
        // todo -> in_progress -> review -> done -> (no-op done) -> todo
        let task = sample_task(TaskStatus::Todo);
        assert!(task.transition(TaskStatus::Done, now()).is_err());

        let task = task.transition(TaskStatus::InProgress, now()).unwrap();
        let task = task.transition(TaskStatus::Review, now()).unwrap();
        let task = task.transition(TaskStatus::Done, now()).unwrap();
        assert!(matches!(
            task.transition(TaskStatus::Done, now()),
            Err(ApiError::NoOpTransition { .. })
        ));
        let task = task.transition(TaskStatus::Todo, now()).unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn reopen_keeps_accumulated_minutes() {
        let task = sample_task(TaskStatus::Done);
        let task = task.log_time(90, now()).unwrap();
        let reopened = task.transition(TaskStatus::Todo, now()).unwrap();
        assert_eq!(reopened.total_minutes, 90);
    }

    #[test]
    fn log_time_rejects_zero_and_negative() {
        let task = sample_task(TaskStatus::Todo);
        assert!(matches!(
            task.log_time(0, now()),
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            task.log_time(-10, now()),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn log_time_rejects_overflowing_total() {
        let mut task = sample_task(TaskStatus::InProgress);
        task.total_minutes = i32::MAX;
        let err = task.log_time(1, now()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        // just below the boundary still works and stays non-negative
        task.total_minutes = i32::MAX - 1;
        let next = task.log_time(1, now()).unwrap();
        assert_eq!(next.total_minutes, i32::MAX);
    }

    #[test]
    fn log_time_is_additive() {
        let task = sample_task(TaskStatus::InProgress);
        let split = task
            .log_time(25, now())
            .unwrap()
            .log_time(35, now())
            .unwrap();
        let once = task.log_time(60, now()).unwrap();
        assert_eq!(split.total_minutes, once.total_minutes);
    }

    #[test]
    fn log_time_allowed_in_any_status() {
        for status in TaskStatus::ALL {
            let task = sample_task(status);
            let next = task.log_time(15, now()).unwrap();
            assert_eq!(next.total_minutes, 15);
            assert_eq!(next.status, status);
        }
    }

    #[test]
    fn apply_update_touches_only_present_fields() {
        let task = sample_task(TaskStatus::Review);
        let update = TaskUpdate {
            title: Some("New title".into()),
            description: None,
            assignee_id: Some(9),
            total_minutes: None,
        };
        let next = task.apply_update(&update, now());
        assert_eq!(next.title, "New title");
        assert_eq!(next.description, None);
        assert_eq!(next.assignee_id, Some(9));
        assert_eq!(next.total_minutes, 0);
        // status never changes through field updates
        assert_eq!(next.status, TaskStatus::Review);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"review\"").unwrap();
        assert_eq!(parsed, TaskStatus::Review);
    }
}
