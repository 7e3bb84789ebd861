use chrono::{DateTime, Local};
use std::fmt;

use crate::workflows::contacts::ContactRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("enter at least one skill (comma separated)")]
    EmptyQuery,
    #[error("no recruiters matched the skills: {query}")]
    NoMatch { query: String },
}

/// Lowercase, trimmed skill tokens in the order the user typed them.
///
/// Empty tokens (`"python,,"`) are dropped and repeats keep their first
/// position, so a query always holds at least one distinct token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillQuery {
    tokens: Vec<String>,
}

impl SkillQuery {
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        let mut tokens: Vec<String> = Vec::new();
        for token in raw.to_lowercase().split(',') {
            let token = token.trim();
            if token.is_empty() || tokens.iter().any(|existing| existing == token) {
                continue;
            }
            tokens.push(token.to_string());
        }

        if tokens.is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn phrase(&self) -> String {
        self.tokens.join(", ")
    }
}

impl fmt::Display for SkillQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

/// A retained recruiter plus the query tokens that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub record: ContactRecord,
    pub matched_skills: Vec<String>,
}

impl MatchResult {
    /// Comma-joined matched skills, used in both the body and the subject.
    pub fn skills_phrase(&self) -> String {
        self.matched_skills.join(", ")
    }

    /// `"<name> (<role>) at <company>"`, the label shown above each preview.
    pub fn heading(&self) -> String {
        format!(
            "{} ({}) at {}",
            self.record.full_name(),
            self.record.role(),
            self.record.company()
        )
    }
}

/// Rendered outreach for one matched recruiter. Never cached; re-render to
/// pick up a changed sender name or template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
    Sent { at: DateTime<Local> },
    Failed { reason: String },
}

impl SendState {
    pub fn label(&self) -> &'static str {
        match self {
            SendState::Idle => "not sent",
            SendState::Sending => "sending",
            SendState::Sent { .. } => "sent",
            SendState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub recipient: String,
    pub recipient_name: String,
    pub sent_at: DateTime<Local>,
}
