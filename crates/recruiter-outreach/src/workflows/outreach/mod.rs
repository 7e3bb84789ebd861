//! Skill matching, outreach rendering and per-recipient delivery.

pub mod dispatch;
pub mod domain;
pub mod matcher;
pub mod session;
pub mod template;

#[cfg(test)]
mod tests;

pub use dispatch::{
    build_message, Attachment, Dispatcher, MailTransport, OutboundMail, SendCredentials,
    SendError, SmtpRelay,
};
pub use domain::{MatchError, MatchResult, MessageDraft, SendReceipt, SendState, SkillQuery};
pub use matcher::{match_contacts, matching_tokens};
pub use session::{OutreachSession, SendActionError, SendOutcome};
pub use template::{subject_line, title_case, MessageTemplate, RenderContext, TemplateError};
