use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{FamilyMember, FamilyMemberUpdate, NewFamilyMember, Report, ReportUpload};

// The backend is inconsistent about wrapping payloads, so each response is
// accepted either bare or inside its named envelope.

#[derive(Deserialize)]
#[serde(untagged)]
enum MemberEnvelope {
    Wrapped {
        #[serde(rename = "familyMember")]
        family_member: FamilyMember,
    },
    Bare(FamilyMember),
}

impl From<MemberEnvelope> for FamilyMember {
    fn from(envelope: MemberEnvelope) -> Self {
        match envelope {
            MemberEnvelope::Wrapped { family_member } => family_member,
            MemberEnvelope::Bare(member) => member,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MemberListEnvelope {
    Bare(Vec<FamilyMember>),
    Wrapped {
        #[serde(rename = "familyMembers")]
        family_members: Vec<FamilyMember>,
    },
}

impl From<MemberListEnvelope> for Vec<FamilyMember> {
    fn from(envelope: MemberListEnvelope) -> Self {
        match envelope {
            MemberListEnvelope::Bare(members) => members,
            MemberListEnvelope::Wrapped { family_members } => family_members,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportEnvelope {
    Wrapped { report: Report },
    Bare(Report),
}

impl From<ReportEnvelope> for Report {
    fn from(envelope: ReportEnvelope) -> Self {
        match envelope {
            ReportEnvelope::Wrapped { report } => report,
            ReportEnvelope::Bare(report) => report,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportListEnvelope {
    Bare(Vec<Report>),
    Wrapped { reports: Vec<Report> },
}

impl From<ReportListEnvelope> for Vec<Report> {
    fn from(envelope: ReportListEnvelope) -> Self {
        match envelope {
            ReportListEnvelope::Bare(reports) => reports,
            ReportListEnvelope::Wrapped { reports } => reports,
        }
    }
}

fn member_path(id: &str) -> String {
    format!("/family-members/{}", urlencoding::encode(id))
}

fn reports_path(id: &str) -> String {
    format!("{}/reports", member_path(id))
}

/// `/family-members` endpoints.
///
/// Field presence is the caller's concern; nothing is validated here.
#[derive(Clone, Copy)]
pub struct FamilyMemberApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FamilyMemberApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(self) -> Result<Vec<FamilyMember>, ApiError> {
        let request = self.client.request(Method::GET, "/family-members");
        let envelope: MemberListEnvelope = self.client.send(request).await?;
        Ok(envelope.into())
    }

    pub async fn get_by_id(self, id: &str) -> Result<FamilyMember, ApiError> {
        let request = self.client.request(Method::GET, &member_path(id));
        let envelope: MemberEnvelope = self.client.send(request).await?;
        Ok(envelope.into())
    }

    pub async fn create(self, member: &NewFamilyMember) -> Result<FamilyMember, ApiError> {
        let request = self
            .client
            .request(Method::POST, "/family-members")
            .json(member);
        let envelope: MemberEnvelope = self.client.send(request).await?;
        Ok(envelope.into())
    }

    pub async fn update(
        self,
        id: &str,
        update: &FamilyMemberUpdate,
    ) -> Result<FamilyMember, ApiError> {
        let request = self
            .client
            .request(Method::PUT, &member_path(id))
            .json(update);
        let envelope: MemberEnvelope = self.client.send(request).await?;
        Ok(envelope.into())
    }

    pub async fn reports(self, id: &str) -> Result<Vec<Report>, ApiError> {
        let request = self.client.request(Method::GET, &reports_path(id));
        let envelope: ReportListEnvelope = self.client.send(request).await?;
        Ok(envelope.into())
    }

    /// Sends a report as multipart (`report` file part plus `title`).
    ///
    /// The backend stores the file and returns it with its AI analysis.
    pub async fn upload_report(self, id: &str, upload: ReportUpload) -> Result<Report, ApiError> {
        let ReportUpload { file, title } = upload;
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(file.mime_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let form = Form::new().text("title", title).part("report", part);

        let request = self
            .client
            .request(Method::POST, &reports_path(id))
            .multipart(form);
        let envelope: ReportEnvelope = self.client.send(request).await?;
        Ok(envelope.into())
    }
}
