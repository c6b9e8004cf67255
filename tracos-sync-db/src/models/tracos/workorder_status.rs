use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a TracOS workorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkorderStatus {
    Pending,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl WorkorderStatus {
    pub const ALL: [WorkorderStatus; 5] = [
        WorkorderStatus::Pending,
        WorkorderStatus::InProgress,
        WorkorderStatus::Completed,
        WorkorderStatus::OnHold,
        WorkorderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkorderStatus::Pending => "pending",
            WorkorderStatus::InProgress => "in_progress",
            WorkorderStatus::Completed => "completed",
            WorkorderStatus::OnHold => "on_hold",
            WorkorderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for WorkorderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkorderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WorkorderStatus::Pending),
            "in_progress" => Ok(WorkorderStatus::InProgress),
            "completed" => Ok(WorkorderStatus::Completed),
            "on_hold" => Ok(WorkorderStatus::OnHold),
            "cancelled" => Ok(WorkorderStatus::Cancelled),
            _ => Err(format!("Invalid WorkorderStatus: {s}")),
        }
    }
}
