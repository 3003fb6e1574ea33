use clap::Args;
use health_plus_core::{Dashboard, Route};

use super::{require_session, AppShell, CommandError, OutputFormat};

#[derive(Args)]
pub struct DashboardCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl DashboardCommand {
    pub async fn run(&self, shell: &AppShell) -> Result<(), CommandError> {
        require_session(shell, Route::Dashboard)?;

        let dashboard = shell
            .run(|api| api.dashboard().get())
            .await
            .map_err(|e| CommandError::api(e, "Failed to load dashboard"))?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            }
            OutputFormat::Text => {
                let greeting = shell
                    .session()
                    .user()
                    .map(|u| format!("Welcome back, {}!", u.name))
                    .unwrap_or_else(|| "Welcome back!".to_string());
                println!("{}\n", greeting);
                print!("{}", render(&dashboard));
            }
        }

        Ok(())
    }
}

fn render(dashboard: &Dashboard) -> String {
    let summary = dashboard.summary();
    let mut out = String::new();

    out.push_str(&format!("Family members: {}\n", summary.members));
    out.push_str(&format!("Reports:        {}\n", summary.reports));
    out.push_str(&format!("Medications:    {}\n", summary.medications));
    out.push('\n');

    if dashboard.family_members.is_empty() {
        out.push_str("No family members yet. Add one with 'hplus member add'.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<26} {:<20} {:>4}  {:<14} {:>7}\n",
        "ID", "NAME", "AGE", "RELATIONSHIP", "REPORTS"
    ));
    out.push_str(&format!("{}\n", "-".repeat(76)));
    for member in &dashboard.family_members {
        out.push_str(&format!(
            "{:<26} {:<20} {:>4}  {:<14} {:>7}\n",
            member.id,
            member.name,
            member.age,
            member.relationship,
            member.reports.len()
        ));
    }

    out
}
