use serde::{Deserialize, Serialize};

use super::family_member::FamilyMember;

/// Body of `GET /dashboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub family_members: Vec<FamilyMember>,
}

/// Counts shown above the family roster.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub members: usize,
    pub reports: usize,
    pub medications: usize,
}

impl Dashboard {
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            members: self.family_members.len(),
            reports: self.family_members.iter().map(|m| m.reports.len()).sum(),
            medications: self.family_members.iter().map(|m| m.medications.len()).sum(),
        }
    }
}
