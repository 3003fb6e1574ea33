use clap::Args;
use health_plus_core::{ChatRole, ChatTranscript, HealthAnswer, Route};
use std::io::{self, Write};

use super::{require_session, AppShell, CommandError};

const AI_FALLBACK: &str = "Failed to get AI response";

/// Ask the health assistant a single question
#[derive(Args)]
pub struct AskCommand {
    /// Question for the assistant
    #[arg(required = true, num_args = 1..)]
    question: Vec<String>,
}

impl AskCommand {
    pub async fn run(&self, shell: &AppShell) -> Result<(), CommandError> {
        require_session(shell, Route::Dashboard)?;

        let question = self.question.join(" ");
        let question = question.trim();
        if question.is_empty() {
            return Err(CommandError::InvalidInput(
                "Question cannot be empty".to_string(),
            ));
        }

        let answer = query(shell, question).await?;
        println!("{}", answer.response);
        Ok(())
    }
}

/// Chat with the health assistant interactively
#[derive(Args)]
pub struct ChatCommand {
    /// Print the transcript as JSON when the chat ends
    #[arg(long)]
    json: bool,
}

impl ChatCommand {
    pub async fn run(&self, shell: &AppShell) -> Result<(), CommandError> {
        require_session(shell, Route::Dashboard)?;

        println!("AI Health Assistant");
        println!("Ask about symptoms, medications or general health. Empty line or 'exit' to quit.");
        println!("Answers are informational and no substitute for professional medical advice.\n");

        let mut transcript = ChatTranscript::new();

        loop {
            print!("you> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if io::stdin().read_line(&mut line)? == 0 {
                break;
            }
            let question = line.trim();
            if question.is_empty() || question.eq_ignore_ascii_case("exit") {
                break;
            }

            transcript.ask(question);
            match query(shell, question).await {
                Ok(answer) => {
                    println!("ai> {}\n", answer.response);
                    transcript.answer(answer);
                }
                Err(e) => {
                    transcript.rollback();
                    // Sent back to login; the session is gone
                    if shell.navigator().current() == Some(Route::Login) {
                        return Err(e);
                    }
                    eprintln!("Error: {}\n", e);
                }
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(transcript.messages())?);
        } else {
            let answered = transcript
                .messages()
                .iter()
                .filter(|m| m.role == ChatRole::Ai)
                .count();
            println!("{} question(s) answered.", answered);
        }
        Ok(())
    }
}

async fn query(shell: &AppShell, question: &str) -> Result<HealthAnswer, CommandError> {
    shell
        .run(|api| api.ai().health_query(question))
        .await
        .map_err(|e| CommandError::api(e, AI_FALLBACK))
}
