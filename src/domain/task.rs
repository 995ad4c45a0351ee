use serde::{Deserialize, Serialize};

use crate::domain::record_id::RecordId;

pub const COMPLETED_STATUS: &str = "completed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    #[serde(default)]
    pub project_id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<RecordId>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(COMPLETED_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_status_counts_as_done() {
        let json = r#"[
            { "id": 1, "projectId": 2, "status": "completed" },
            { "id": 2, "projectId": 2, "status": "in-progress" },
            { "id": 3, "projectId": 2 }
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        let done: Vec<bool> = tasks.iter().map(Task::is_completed).collect();
        assert_eq!(done, vec![true, false, false]);
    }
}
