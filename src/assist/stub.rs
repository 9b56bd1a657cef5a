//! Deterministic offline suggestion texts. Used directly in stub mode and
//! as the fallback when a live provider call fails, so both paths produce
//! byte-identical output for the same input.

use crate::assist::dto::TaskBrief;

pub fn describe_task(title: &str) -> String {
    format!(
        "This task involves working on '{title}'. \
         Key deliverables include: planning, implementation, testing, and documentation. \
         Estimated complexity: medium. Priority: normal."
    )
}

pub fn daily_plan(tasks: &[TaskBrief]) -> String {
    if tasks.is_empty() {
        return "No tasks assigned. Consider picking up new work from the backlog.".into();
    }

    let items: Vec<String> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. [{}] {}", i + 1, t.status.as_str().to_uppercase(), t.title))
        .collect();

    format!(
        "Here's your daily plan:\n{}\n\nFocus on in-progress items first, then move to reviews.",
        items.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::lifecycle::TaskStatus;

    #[test]
    fn describe_task_is_deterministic() {
        assert_eq!(describe_task("X"), describe_task("X"));
        assert!(describe_task("Ship it").contains("'Ship it'"));
    }

    #[test]
    fn daily_plan_empty_list() {
        assert_eq!(
            daily_plan(&[]),
            "No tasks assigned. Consider picking up new work from the backlog."
        );
    }

    #[test]
    fn daily_plan_preserves_input_order_and_uppercases_status() {
        let tasks = vec![
            TaskBrief {
                title: "Fix login".into(),
                status: TaskStatus::InProgress,
            },
            TaskBrief {
                title: "Review PR".into(),
                status: TaskStatus::Review,
            },
        ];
        let plan = daily_plan(&tasks);
        assert!(plan.contains("1. [IN_PROGRESS] Fix login"));
        assert!(plan.contains("2. [REVIEW] Review PR"));
        assert!(plan.ends_with("Focus on in-progress items first, then move to reviews."));
    }
}
