//! Persisted row shape of the `nodes` table.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use docvault_core::types::NodeId;

use super::flag::FlagCategory;
use super::model::Node;

/// One row of the metadata collection, column for column.
///
/// `file_path` predates `storage_path` and carries the same key; both are
/// written so older readers keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NodeRecord {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Legacy copy of the storage key.
    pub file_path: Option<String>,
    /// File size in bytes.
    pub file_size: Option<i64>,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Folder/file discriminator.
    pub is_folder: bool,
    /// Owning folder.
    pub parent_folder_id: Option<Uuid>,
    /// Object store key.
    pub storage_path: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Holds the safety-plan flag.
    #[serde(default)]
    pub is_current_safety_plan: bool,
    /// Holds the risk-assessment flag.
    #[serde(default)]
    pub is_current_risk_assessment: bool,
    /// Holds the insurance flag.
    #[serde(default)]
    pub is_current_insurance: bool,
}

impl NodeRecord {
    fn flag(&self, category: FlagCategory) -> bool {
        match category {
            FlagCategory::SafetyPlan => self.is_current_safety_plan,
            FlagCategory::RiskAssessment => self.is_current_risk_assessment,
            FlagCategory::Insurance => self.is_current_insurance,
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let flags: BTreeSet<FlagCategory> = FlagCategory::ALL
            .into_iter()
            .filter(|c| record.flag(*c))
            .collect();

        Node {
            id: NodeId::from_uuid(record.id),
            name: record.name,
            is_folder: record.is_folder,
            parent_id: record.parent_folder_id.map(NodeId::from_uuid),
            storage_key: record.storage_path.or(record.file_path),
            size_bytes: record.file_size,
            mime_type: record.mime_type,
            created_at: record.created_at,
            flags,
        }
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.into_uuid(),
            name: node.name.clone(),
            file_path: node.storage_key.clone(),
            file_size: node.size_bytes,
            mime_type: node.mime_type.clone(),
            is_folder: node.is_folder,
            parent_folder_id: node.parent_id.map(NodeId::into_uuid),
            storage_path: node.storage_key.clone(),
            created_at: node.created_at,
            is_current_safety_plan: node.has_flag(FlagCategory::SafetyPlan),
            is_current_risk_assessment: node.has_flag(FlagCategory::RiskAssessment),
            is_current_insurance: node.has_flag(FlagCategory::Insurance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_file_path_fallback() {
        let record = NodeRecord {
            id: Uuid::new_v4(),
            name: "plan.pdf".into(),
            file_path: Some("legacy/plan.pdf".into()),
            file_size: Some(10),
            mime_type: Some("application/pdf".into()),
            is_folder: false,
            parent_folder_id: None,
            storage_path: None,
            created_at: Utc::now(),
            is_current_safety_plan: true,
            is_current_risk_assessment: false,
            is_current_insurance: false,
        };
        let node = Node::from(record);
        assert_eq!(node.storage_key.as_deref(), Some("legacy/plan.pdf"));
        assert!(node.has_flag(FlagCategory::SafetyPlan));
        assert!(!node.has_flag(FlagCategory::Insurance));
    }
}
