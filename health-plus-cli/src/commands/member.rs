use clap::{Args, Subcommand};
use health_plus_core::models::report::{truncate_analysis, ANALYSIS_PREVIEW_CHARS};
use health_plus_core::{
    FamilyMember, FamilyMemberUpdate, NewFamilyMember, Report, ReportFile, ReportUpload, Route,
};
use std::borrow::Cow;
use std::path::PathBuf;

use super::{require_session, AppShell, CommandError, OutputFormat};

#[derive(Args)]
pub struct MemberCommand {
    #[command(subcommand)]
    pub command: MemberSubcommand,
}

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// List family members
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a family member with history, medications and reports
    Show {
        /// Family member ID
        id: String,

        /// Print AI analyses in full
        #[arg(long)]
        full: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a family member
    Add {
        /// Full name
        #[arg(long, short)]
        name: String,

        /// Age in years
        #[arg(long, short)]
        age: u32,

        /// Gender (e.g., male, female, other)
        #[arg(long, short)]
        gender: String,

        /// Relationship to you (e.g., mother, son, self)
        #[arg(long, short)]
        relationship: String,
    },

    /// Update a family member's details
    Update {
        /// Family member ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        relationship: Option<String>,
    },

    /// List a family member's reports
    Reports {
        /// Family member ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Upload a report (JPG, PNG or PDF, up to 10MB) for AI analysis
    Upload {
        /// Family member ID
        id: String,

        /// Report file
        file: PathBuf,

        /// Report title (defaults to the file name)
        #[arg(long, short)]
        title: Option<String>,
    },
}

impl MemberCommand {
    pub async fn run(&self, shell: &AppShell) -> Result<(), CommandError> {
        match &self.command {
            MemberSubcommand::List { format } => {
                require_session(shell, Route::Dashboard)?;

                let members = shell
                    .run(|api| api.family_members().get_all())
                    .await
                    .map_err(|e| CommandError::api(e, "Failed to load family members"))?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&members)?),
                    OutputFormat::Text => {
                        if members.is_empty() {
                            println!("No family members found.");
                            return Ok(());
                        }
                        for member in &members {
                            println!(
                                "{}  {} ({}, {}, {})",
                                member.id,
                                member.name,
                                member.age,
                                member.gender,
                                member.relationship
                            );
                        }
                        println!("\nTotal: {} member(s)", members.len());
                    }
                }
                Ok(())
            }

            MemberSubcommand::Show { id, full, format } => {
                require_session(shell, Route::FamilyMember(id.clone()))?;

                let member = shell
                    .run(|api| api.family_members().get_by_id(id))
                    .await
                    .map_err(|e| CommandError::api(e, "Failed to load member details"))?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&member)?),
                    OutputFormat::Text => print!("{}", render_member(&member, *full)),
                }
                Ok(())
            }

            MemberSubcommand::Add {
                name,
                age,
                gender,
                relationship,
            } => {
                require_session(shell, Route::Dashboard)?;

                let member = NewFamilyMember {
                    name: non_blank(name, "Name")?,
                    age: *age,
                    gender: non_blank(gender, "Gender")?,
                    relationship: non_blank(relationship, "Relationship")?,
                };

                let created = shell
                    .run(|api| api.family_members().create(&member))
                    .await
                    .map_err(|e| CommandError::api(e, "Failed to add family member"))?;

                println!("Family member added successfully!");
                println!("  ID: {}", created.id);
                println!("  Name: {}", created.name);
                Ok(())
            }

            MemberSubcommand::Update {
                id,
                name,
                age,
                gender,
                relationship,
            } => {
                require_session(shell, Route::FamilyMember(id.clone()))?;

                let update = FamilyMemberUpdate {
                    name: name.as_deref().map(|v| non_blank(v, "Name")).transpose()?,
                    age: *age,
                    gender: gender.as_deref().map(|v| non_blank(v, "Gender")).transpose()?,
                    relationship: relationship
                        .as_deref()
                        .map(|v| non_blank(v, "Relationship"))
                        .transpose()?,
                    ..Default::default()
                };
                if update.is_empty() {
                    return Err(CommandError::InvalidInput(
                        "Nothing to update. Pass at least one of --name, --age, --gender, --relationship."
                            .to_string(),
                    ));
                }

                let updated = shell
                    .run(|api| api.family_members().update(id, &update))
                    .await
                    .map_err(|e| CommandError::api(e, "Failed to update family member"))?;

                println!("Family member updated.");
                print!("{}", updated);
                Ok(())
            }

            MemberSubcommand::Reports { id, format } => {
                require_session(shell, Route::FamilyMember(id.clone()))?;

                let reports = shell
                    .run(|api| api.family_members().reports(id))
                    .await
                    .map_err(|e| CommandError::api(e, "Failed to load reports"))?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                    OutputFormat::Text => {
                        if reports.is_empty() {
                            println!("No reports uploaded yet.");
                            return Ok(());
                        }
                        for report in &reports {
                            print!("{}", render_report(report, false));
                        }
                    }
                }
                Ok(())
            }

            MemberSubcommand::Upload { id, file, title } => {
                require_session(shell, Route::FamilyMember(id.clone()))?;

                let file = ReportFile::from_path(file).await?;
                let upload = ReportUpload::new(file, title.clone())?;

                println!("Uploading & analyzing '{}'...", upload.title);
                let report = shell
                    .run(|api| api.family_members().upload_report(id, upload))
                    .await
                    .map_err(|e| CommandError::api(e, "Failed to upload report"))?;

                println!("Report uploaded and analyzed successfully!\n");
                print!("{}", render_report(&report, true));
                Ok(())
            }
        }
    }
}

fn non_blank(value: &str, field: &str) -> Result<String, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandError::InvalidInput(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(value.to_string())
}

fn render_report(report: &Report, full: bool) -> String {
    let mut out = format!("{}\n", report);
    if !report.ai_analysis.is_empty() {
        let analysis = if full {
            Cow::Borrowed(report.ai_analysis.as_str())
        } else {
            truncate_analysis(&report.ai_analysis, ANALYSIS_PREVIEW_CHARS)
        };
        out.push_str("  AI analysis:\n");
        for line in analysis.lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out.push('\n');
    out
}

fn render_member(member: &FamilyMember, full: bool) -> String {
    let mut out = member.to_string();
    out.push_str("\nReports:\n");
    if member.reports.is_empty() {
        out.push_str("  No reports uploaded yet\n");
    }
    for report in &member.reports {
        for line in render_report(report, full).lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("  {}\n", line));
            }
        }
    }
    out
}
