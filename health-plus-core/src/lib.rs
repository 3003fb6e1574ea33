//! Health Plus Core Library
//!
//! Session handling, the backend API pipeline and shared payload types for
//! Health Plus clients.

pub mod api;
pub mod error;
pub mod models;
pub mod session;
pub mod shell;

pub use api::{
    AiApi, ApiClient, AuthApi, BackendTarget, ClientOptions, DashboardApi, FamilyMemberApi,
    Scheme,
};
pub use error::{ApiError, StorageError};
pub use models::{
    AuthResponse, ChatMessage, ChatRole, ChatTranscript, Dashboard, DashboardSummary,
    FamilyMember, FamilyMemberUpdate, HealthAnswer, MedicalHistory, Medication, NewFamilyMember,
    Report, ReportFile, ReportFileError, ReportUpload, UserIdentity,
};
pub use session::{FileStorage, KeyValueStorage, MemoryStorage, Session, SessionStore};
pub use shell::{Navigator, Route, Shell, ShellError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
