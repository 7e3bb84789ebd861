use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use super::dispatch::{Attachment, Dispatcher, MailTransport, SendCredentials, SendError};
use super::domain::{MatchResult, MessageDraft, SendReceipt, SendState};
use super::template::MessageTemplate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendActionError {
    #[error("no matched recruiter at position {index}")]
    UnknownRecipient { index: usize },
    #[error("provide your sender email and app password before sending")]
    MissingCredentials,
    #[error("attach your resume before sending emails")]
    MissingAttachment,
    #[error("error sending email: {0}")]
    Send(#[from] SendError),
}

pub type SendOutcome = Result<SendReceipt, SendActionError>;

/// Matched recruiters plus one independent send action per recruiter.
///
/// Credentials and the resume are optional until the moment of sending; a
/// send without them fails its precondition check and never reaches the
/// transport.
#[derive(Debug)]
pub struct OutreachSession<T> {
    matches: Vec<MatchResult>,
    states: Vec<SendState>,
    template: MessageTemplate,
    sender_name: String,
    credentials: Option<SendCredentials>,
    attachment: Option<Arc<Attachment>>,
    dispatcher: Dispatcher<T>,
}

impl<T: MailTransport> OutreachSession<T> {
    pub fn new(matches: Vec<MatchResult>, template: MessageTemplate, transport: Arc<T>) -> Self {
        let states = vec![SendState::Idle; matches.len()];
        Self {
            matches,
            states,
            template,
            sender_name: String::new(),
            credentials: None,
            attachment: None,
            dispatcher: Dispatcher::new(transport),
        }
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = sender_name.into();
        self
    }

    pub fn set_sender_name(&mut self, sender_name: impl Into<String>) {
        self.sender_name = sender_name.into();
    }

    pub fn set_credentials(&mut self, credentials: Option<SendCredentials>) {
        self.credentials = credentials;
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.attachment = attachment.map(Arc::new);
    }

    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<&SendState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[SendState] {
        &self.states
    }

    /// Renders the draft for `index` afresh on every call.
    pub fn draft(&self, index: usize) -> Option<MessageDraft> {
        self.matches
            .get(index)
            .map(|matched| self.template.draft(matched, &self.sender_name))
    }

    /// Sends to the recruiter at `index`. May be invoked again after either
    /// outcome; no other recipient's state is touched.
    pub fn send(&mut self, index: usize) -> SendOutcome {
        let draft = self
            .draft(index)
            .ok_or(SendActionError::UnknownRecipient { index })?;
        let credentials = self
            .credentials
            .clone()
            .ok_or(SendActionError::MissingCredentials)?;
        let attachment = self
            .attachment
            .clone()
            .ok_or(SendActionError::MissingAttachment)?;

        let recipient_name = self.matches[index].record.full_name().to_string();
        self.states[index] = SendState::Sending;

        match self
            .dispatcher
            .dispatch(&credentials, &self.sender_name, &draft, &attachment)
        {
            Ok(()) => {
                let sent_at = Local::now();
                self.states[index] = SendState::Sent { at: sent_at };
                info!(index, recipient_name = %recipient_name, "recipient marked sent");
                Ok(SendReceipt {
                    recipient: draft.recipient,
                    recipient_name,
                    sent_at,
                })
            }
            Err(err) => {
                warn!(index, recipient_name = %recipient_name, error = %err, "send failed");
                self.states[index] = SendState::Failed {
                    reason: err.to_string(),
                };
                Err(SendActionError::Send(err))
            }
        }
    }
}
