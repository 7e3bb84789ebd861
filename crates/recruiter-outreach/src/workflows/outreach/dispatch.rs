use std::fmt::{self, Debug};
use std::path::Path;
use std::sync::Arc;

use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment as AttachmentPart, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use tracing::{debug, info};

use super::domain::MessageDraft;
use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("invalid {field} address '{value}': {reason}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("mail relay error: {0}")]
    Transport(String),
}

/// Sender address plus app password. Only held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct SendCredentials {
    address: String,
    secret: String,
}

impl SendCredentials {
    /// `None` when either part is blank, which callers treat as missing.
    pub fn new(address: impl Into<String>, secret: impl Into<String>) -> Option<Self> {
        let address = address.into().trim().to_string();
        let secret = secret.into();
        if address.is_empty() || secret.trim().is_empty() {
            return None;
        }
        Some(Self { address, secret })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn secret(&self) -> &str {
        &self.secret
    }
}

impl Debug for SendCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendCredentials")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Resume bytes shared by every send in a session.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Ok(Self::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A fully built MIME message ready for submission.
#[derive(Debug, Clone)]
pub struct OutboundMail {
    recipient: String,
    message: Message,
}

impl OutboundMail {
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn formatted(&self) -> Vec<u8> {
        self.message.formatted()
    }
}

/// Submits one message per call over its own connection.
pub trait MailTransport: Debug {
    fn submit(&self, credentials: &SendCredentials, mail: &OutboundMail) -> Result<(), SendError>;
}

/// STARTTLS submission relay (`smtp.gmail.com:587` by default).
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    host: String,
    port: u16,
}

impl SmtpRelay {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.relay_host.clone(), config.relay_port)
    }

    fn map_error<E: fmt::Display>(err: E) -> SendError {
        SendError::Transport(err.to_string())
    }
}

impl MailTransport for SmtpRelay {
    fn submit(&self, credentials: &SendCredentials, mail: &OutboundMail) -> Result<(), SendError> {
        // Built per call: the transport is dropped (QUIT) before returning.
        let transport = SmtpTransport::starttls_relay(&self.host)
            .map_err(SmtpRelay::map_error)?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.address().to_string(),
                credentials.secret().to_string(),
            ))
            .build();

        debug!(host = %self.host, port = self.port, recipient = %mail.recipient, "submitting message");
        let response = transport
            .send(&mail.message)
            .map_err(SmtpRelay::map_error)?;
        debug!(code = %response.code(), "relay accepted message");
        Ok(())
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, SendError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|err| SendError::InvalidAddress {
            field,
            value: value.to_string(),
            reason: err.to_string(),
        })
}

/// `multipart/mixed` message: a plain-text body and the resume as a base64
/// `application/octet-stream` attachment.
pub fn build_message(
    credentials: &SendCredentials,
    sender_name: &str,
    draft: &MessageDraft,
    attachment: &Attachment,
) -> Result<OutboundMail, SendError> {
    let sender_name = sender_name.trim();
    let from = Mailbox::new(
        (!sender_name.is_empty()).then(|| sender_name.to_string()),
        parse_address("sender", credentials.address())?,
    );
    let to = Mailbox::new(None, parse_address("recipient", &draft.recipient)?);

    let content_type = ContentType::parse(mime::APPLICATION_OCTET_STREAM.as_ref())
        .map_err(|err| SendError::Build(err.to_string()))?;
    let body = Body::new_with_encoding(attachment.bytes().to_vec(), ContentTransferEncoding::Base64)
        .map_err(|_| SendError::Build("attachment could not be base64 encoded".to_string()))?;
    let resume = AttachmentPart::new(attachment.filename().to_string()).body(body, content_type);

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(draft.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(draft.body.clone()))
                .singlepart(resume),
        )
        .map_err(|err| SendError::Build(err.to_string()))?;

    Ok(OutboundMail {
        recipient: draft.recipient.trim().to_string(),
        message,
    })
}

/// Builds and submits one message. No retries; a failure is returned to the
/// caller and the next call starts from scratch.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: Arc<T>,
}

impl<T: MailTransport> Dispatcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn dispatch(
        &self,
        credentials: &SendCredentials,
        sender_name: &str,
        draft: &MessageDraft,
        attachment: &Attachment,
    ) -> Result<(), SendError> {
        let mail = build_message(credentials, sender_name, draft, attachment)?;
        self.transport.submit(credentials, &mail)?;
        info!(recipient = %mail.recipient, attachment = %attachment.filename(), "outreach email sent");
        Ok(())
    }
}
