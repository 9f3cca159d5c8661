//! Craftsman records
//!
//! The toolkit does not manage sessions or credentials; the active craftsman
//! identity comes from configuration (or `--craftsman`) and must refer to one
//! of these records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// A maintenance technician who performs work and files reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craftsman {
    /// Unique identifier
    pub id: RecordId,

    /// Full name
    pub name: String,

    /// Trade or specialization (e.g. "electrician")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Craftsman {
    /// Create a new craftsman record
    pub fn new(name: String, trade: Option<String>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Cm),
            name,
            trade,
            created: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_craftsman_creation() {
        let cm = Craftsman::new("Ada Fowler".to_string(), Some("millwright".to_string()));
        assert!(cm.id.to_string().starts_with("CM-"));
        assert_eq!(cm.name, "Ada Fowler");
        assert_eq!(cm.trade.as_deref(), Some("millwright"));
    }
}
