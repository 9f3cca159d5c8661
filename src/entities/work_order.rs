//! Work order records and their status lifecycle

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// Work order status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl WorkOrderStatus {
    /// Get allowed transitions from the current status
    ///
    /// The report-submission side effect sets Completed directly and does not
    /// consult this relation.
    pub fn allowed_transitions(&self) -> Vec<WorkOrderStatus> {
        match self {
            WorkOrderStatus::Open => vec![
                WorkOrderStatus::InProgress,
                WorkOrderStatus::OnHold,
                WorkOrderStatus::Cancelled,
            ],
            WorkOrderStatus::InProgress => vec![
                WorkOrderStatus::Completed,
                WorkOrderStatus::OnHold,
                WorkOrderStatus::Cancelled,
            ],
            WorkOrderStatus::OnHold => vec![
                WorkOrderStatus::Open,
                WorkOrderStatus::InProgress,
                WorkOrderStatus::Cancelled,
            ],
            WorkOrderStatus::Completed => vec![WorkOrderStatus::InProgress],
            WorkOrderStatus::Cancelled => vec![WorkOrderStatus::Open],
        }
    }

    /// Check if a status transition is valid
    pub fn can_transition_to(&self, to: WorkOrderStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkOrderStatus::Open => write!(f, "open"),
            WorkOrderStatus::InProgress => write!(f, "in_progress"),
            WorkOrderStatus::Completed => write!(f, "completed"),
            WorkOrderStatus::OnHold => write!(f, "on_hold"),
            WorkOrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for WorkOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(WorkOrderStatus::Open),
            "in_progress" => Ok(WorkOrderStatus::InProgress),
            "completed" => Ok(WorkOrderStatus::Completed),
            "on_hold" => Ok(WorkOrderStatus::OnHold),
            "cancelled" => Ok(WorkOrderStatus::Cancelled),
            _ => Err(format!(
                "Unknown work order status: {}. Use open, in_progress, completed, on_hold, or cancelled",
                s
            )),
        }
    }
}

/// Work order priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A unit of assigned maintenance work against a piece of equipment
///
/// `completed_date` records the most recent transition to Completed and is
/// sticky: moving a completed order back to a working status leaves it in
/// place, and a later re-completion overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Unique identifier
    pub id: RecordId,

    /// Short title
    pub title: String,

    /// Free-text description of the work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target equipment (unattached orders exist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<RecordId>,

    /// Assigned craftsman (unassigned orders exist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub craftsman: Option<RecordId>,

    /// Priority
    #[serde(default)]
    pub priority: Priority,

    /// Status
    #[serde(default)]
    pub status: WorkOrderStatus,

    /// Creation timestamp (immutable)
    pub created: DateTime<Utc>,

    /// Due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Date of the most recent completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkOrder {
    /// Create a new open work order
    pub fn new(title: String) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Wo),
            title,
            description: None,
            equipment: None,
            craftsman: None,
            priority: Priority::default(),
            status: WorkOrderStatus::default(),
            created: Utc::now(),
            due_date: None,
            completed_date: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_order_creation() {
        let wo = WorkOrder::new("Quarterly pump inspection".to_string());
        assert!(wo.id.to_string().starts_with("WO-"));
        assert_eq!(wo.status, WorkOrderStatus::Open);
        assert_eq!(wo.priority, Priority::Medium);
        assert!(wo.completed_date.is_none());
    }

    #[test]
    fn test_status_transitions() {
        assert!(WorkOrderStatus::Open.can_transition_to(WorkOrderStatus::InProgress));
        assert!(WorkOrderStatus::InProgress.can_transition_to(WorkOrderStatus::Completed));
        assert!(WorkOrderStatus::Completed.can_transition_to(WorkOrderStatus::InProgress));
        assert!(!WorkOrderStatus::Open.can_transition_to(WorkOrderStatus::Completed));
        assert!(!WorkOrderStatus::Cancelled.can_transition_to(WorkOrderStatus::Completed));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "in-progress".parse::<WorkOrderStatus>().unwrap(),
            WorkOrderStatus::InProgress
        );
        assert_eq!(
            "ON_HOLD".parse::<WorkOrderStatus>().unwrap(),
            WorkOrderStatus::OnHold
        );
        assert!("done".parse::<WorkOrderStatus>().is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }
}
