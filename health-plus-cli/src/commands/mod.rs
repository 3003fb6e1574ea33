mod ask;
mod auth;
mod config_cmd;
mod dashboard;
mod member;

pub use ask::{AskCommand, ChatCommand};
pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use dashboard::DashboardCommand;
pub use member::MemberCommand;

use clap::ValueEnum;
use health_plus_core::{
    ApiError, Navigator, ReportFileError, Route, Shell, ShellError, StorageError,
};
use std::io::{self, IsTerminal, Write};

use crate::navigator::TerminalNavigator;

pub type AppShell = Shell<TerminalNavigator>;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Errors surfaced by commands talking to the backend
#[derive(Debug)]
pub enum CommandError {
    /// Backend call failed; the fallback is shown when the backend gave no message
    Api { error: ApiError, fallback: String },
    /// No stored session for a command that needs one
    NotLoggedIn,
    /// Bad or missing user input
    InvalidInput(String),
    /// Local report file rejected before upload
    Report(ReportFileError),
    /// Session storage failure
    Storage(StorageError),
    /// Terminal or output failure
    Io(io::Error),
}

impl CommandError {
    pub fn api(error: ApiError, fallback: &str) -> Self {
        tracing::debug!("Backend call failed: {}", error);
        CommandError::Api {
            error,
            fallback: fallback.to_string(),
        }
    }

    pub fn shell(error: ShellError, fallback: &str) -> Self {
        match error {
            ShellError::Api(error) => Self::api(error, fallback),
            ShellError::Storage(error) => CommandError::Storage(error),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Api { error, fallback } => write!(f, "{}", error.message_or(fallback)),
            CommandError::NotLoggedIn => write!(f, "Not logged in"),
            CommandError::InvalidInput(msg) => write!(f, "{}", msg),
            CommandError::Report(e) => write!(f, "{}", e),
            CommandError::Storage(e) => write!(f, "Session storage error: {}", e),
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

impl From<ReportFileError> for CommandError {
    fn from(e: ReportFileError) -> Self {
        CommandError::Report(e)
    }
}

impl From<StorageError> for CommandError {
    fn from(e: StorageError) -> Self {
        CommandError::Storage(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Io(io::Error::other(e))
    }
}

/// Sends the user to login unless `route` is reachable with the current session.
pub fn require_session(shell: &AppShell, route: Route) -> Result<(), CommandError> {
    match shell.guard(&route) {
        Route::Login if route != Route::Login => {
            shell.navigator().navigate(&Route::Login);
            Err(CommandError::NotLoggedIn)
        }
        _ => Ok(()),
    }
}

/// Returns `value` if given, otherwise asks for it on the terminal.
pub fn value_or_prompt(value: &Option<String>, label: &str) -> Result<String, CommandError> {
    let value = match value {
        Some(v) => v.trim().to_string(),
        None => prompt(label)?,
    };

    if value.is_empty() {
        return Err(CommandError::InvalidInput(format!(
            "{} cannot be empty",
            label
        )));
    }
    Ok(value)
}

/// Returns `value` if given, otherwise reads it without echo.
pub fn password_or_prompt(value: &Option<String>) -> Result<String, CommandError> {
    let password = match value {
        Some(v) => v.clone(),
        None => {
            if !io::stdin().is_terminal() {
                return Err(CommandError::InvalidInput(
                    "Cannot read password from stdin. Use --password.".to_string(),
                ));
            }
            rpassword::prompt_password("Password: ")?
        }
    };

    if password.trim().is_empty() {
        return Err(CommandError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(password)
}

fn prompt(label: &str) -> Result<String, CommandError> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_plus_core::{ApiClient, BackendTarget, ClientOptions, SessionStore, UserIdentity};
    use std::sync::Arc;

    fn offline_shell() -> AppShell {
        let target = BackendTarget::from_url("http://127.0.0.1:9/api").unwrap();
        let api = ApiClient::new(
            target,
            Arc::new(SessionStore::in_memory()),
            ClientOptions::default(),
        )
        .unwrap();
        Shell::new(api, TerminalNavigator::new())
    }

    #[test]
    fn test_require_session_sends_logged_out_user_to_login() {
        let shell = offline_shell();

        let err = require_session(&shell, Route::Dashboard).unwrap_err();
        assert!(matches!(err, CommandError::NotLoggedIn));
        assert_eq!(shell.navigator().current(), Some(Route::Login));
    }

    #[test]
    fn test_require_session_allows_logged_in_user() {
        let shell = offline_shell();
        let user = UserIdentity {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
        };
        shell.session().set_session("abc", &user).unwrap();

        require_session(&shell, Route::FamilyMember("m1".to_string())).unwrap();
        assert_eq!(shell.navigator().current(), None);
    }

    #[test]
    fn test_api_error_uses_backend_message() {
        let err = CommandError::api(
            ApiError::Status {
                status: 400,
                message: Some("Email already registered".to_string()),
            },
            "Registration failed. Please try again.",
        );
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_api_error_falls_back() {
        let err = CommandError::api(
            ApiError::Transport("connection refused".to_string()),
            "Failed to load dashboard",
        );
        assert_eq!(err.to_string(), "Failed to load dashboard");
    }

    #[test]
    fn test_given_value_skips_prompt() {
        let value = value_or_prompt(&Some("  a@b.com ".to_string()), "Email").unwrap();
        assert_eq!(value, "a@b.com");
    }

    #[test]
    fn test_given_password_kept_verbatim() {
        let password = password_or_prompt(&Some(" pw with spaces ".to_string())).unwrap();
        assert_eq!(password, " pw with spaces ");
    }

    #[test]
    fn test_blank_password_rejected() {
        let err = password_or_prompt(&Some("  ".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "Password cannot be empty");
    }

    #[test]
    fn test_blank_value_rejected() {
        let err = value_or_prompt(&Some("   ".to_string()), "Email").unwrap_err();
        assert_eq!(err.to_string(), "Email cannot be empty");
    }
}
