//! Authentication commands for the Health Plus CLI.
//!
//! Login and registration store the returned session in the data
//! directory; every later command reads it from there.

use clap::{Args, Subcommand};

use super::{password_or_prompt, value_or_prompt, AppShell, CommandError};

/// Authentication commands
#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand)]
enum AuthSubcommand {
    /// Log in with email and password
    Login {
        /// Account email (prompted if omitted)
        #[arg(long, short)]
        email: Option<String>,

        /// Account password (prompted if omitted)
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        /// Full name (prompted if omitted)
        #[arg(long, short)]
        name: Option<String>,

        /// Account email (prompted if omitted)
        #[arg(long, short)]
        email: Option<String>,

        /// Account password (prompted if omitted)
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Log out (remove the stored session)
    Logout,
    /// Show authentication status
    Status,
}

impl AuthCommand {
    pub async fn run(&self, shell: &AppShell) -> Result<(), CommandError> {
        match &self.command {
            AuthSubcommand::Login { email, password } => {
                let email = value_or_prompt(email, "Email")?;
                let password = password_or_prompt(password)?;

                let user = shell
                    .login(&email, &password)
                    .await
                    .map_err(|e| CommandError::shell(e, "Login failed. Please try again."))?;

                println!("Login successful!");
                println!("Logged in as {} <{}>", user.name, user.email);
                Ok(())
            }
            AuthSubcommand::Register {
                name,
                email,
                password,
            } => {
                let name = value_or_prompt(name, "Full name")?;
                let email = value_or_prompt(email, "Email")?;
                let password = password_or_prompt(password)?;

                let user = shell
                    .register(&name, &email, &password)
                    .await
                    .map_err(|e| {
                        CommandError::shell(e, "Registration failed. Please try again.")
                    })?;

                println!("Account created successfully!");
                println!("Logged in as {} <{}>", user.name, user.email);
                Ok(())
            }
            AuthSubcommand::Logout => {
                if !shell.session().is_authenticated() {
                    println!("Not logged in.");
                    // Still clear any partial state left behind
                    shell.session().clear_session()?;
                    return Ok(());
                }

                shell.logout()?;
                println!("Logged out.");
                Ok(())
            }
            AuthSubcommand::Status => {
                println!("Authentication Status");
                println!("=====================\n");
                println!("Backend: {}", shell.api().base_url());

                match shell.session().get_session() {
                    Some(session) => {
                        println!("Status: Logged in");
                        println!("User: {} <{}>", session.user.name, session.user.email);
                    }
                    None => {
                        println!("Status: Not logged in");
                        println!("\nRun 'hplus auth login' to sign in.");
                    }
                }
                Ok(())
            }
        }
    }
}
