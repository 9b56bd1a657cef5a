use serde::{Deserialize, Serialize};

use crate::tasks::lifecycle::TaskStatus;

/// Suggestion request. Closed set of kinds; adding one is a compile-time
/// checked change everywhere this enum is matched.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestRequest {
    Description { title: String },
    DailyPlan,
}

/// Response from /ai/suggest. `is_fallback` marks locally synthesized text;
/// `warning` is only present when a live provider call was attempted and
/// failed.
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub suggestion: String,
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The slice of a task the planner cares about.
#[derive(Debug, Clone)]
pub struct TaskBrief {
    pub title: String,
    pub status: TaskStatus,
}
