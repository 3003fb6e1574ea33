use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Body of `POST /ai/health-query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAnswer {
    pub response: String,
    /// RFC 3339. Filled with the local time when the backend omits it.
    #[serde(default = "now_rfc3339")]
    pub timestamp: String,
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub message: String,
    pub timestamp: String,
}

/// In-memory conversation with the health assistant.
///
/// A question is appended as soon as it is asked; if the query fails the
/// question is rolled back so the transcript only holds answered turns.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn ask(&mut self, question: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            message: question.into(),
            timestamp: now_rfc3339(),
        });
    }

    pub fn answer(&mut self, answer: HealthAnswer) {
        self.messages.push(ChatMessage {
            role: ChatRole::Ai,
            message: answer.response,
            timestamp: answer.timestamp,
        });
    }

    /// Drops the trailing unanswered question, if there is one.
    pub fn rollback(&mut self) -> Option<ChatMessage> {
        match self.messages.last() {
            Some(last) if last.role == ChatRole::User => self.messages.pop(),
            _ => None,
        }
    }
}
