//! Payload shapes exchanged with the Health Plus backend.

use serde::{Deserialize, Deserializer};

pub mod chat;
pub mod dashboard;
pub mod family_member;
pub mod report;
pub mod user;

pub use chat::{ChatMessage, ChatRole, ChatTranscript, HealthAnswer};
pub use dashboard::{Dashboard, DashboardSummary};
pub use family_member::{
    FamilyMember, FamilyMemberUpdate, MedicalHistory, Medication, NewFamilyMember,
};
pub use report::{truncate_analysis, Report, ReportFile, ReportFileError, ReportUpload};
pub use user::{AuthResponse, UserIdentity};

/// Reads a list that the backend may send as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
