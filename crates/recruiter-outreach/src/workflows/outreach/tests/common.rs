use std::sync::{Arc, Mutex};

use crate::workflows::contacts::ContactTable;
use crate::workflows::outreach::dispatch::{
    Attachment, MailTransport, OutboundMail, SendCredentials, SendError,
};
use crate::workflows::outreach::{match_contacts, MessageTemplate, OutreachSession, SkillQuery};

pub(super) const RECRUITERS: &str = "Full Name,Company Name,role,skills,email\n\
Ada Park,Initech,Senior React Engineer,\"typescript, graphql\",ada@initech.example\n\
Ben Ortiz,Globex,Data Engineer,\"python, spark\",ben@globex.example\n\
Cleo Ng,Umbrella,Platform Engineer,\"node, kubernetes\",cleo@umbrella.example\n";

#[derive(Debug, Clone)]
pub(super) struct Submission {
    pub(super) sender: String,
    pub(super) recipient: String,
    pub(super) raw: String,
}

/// Records submissions; optionally rejects every call with a fixed reason.
#[derive(Debug, Default)]
pub(super) struct RecordingTransport {
    submissions: Mutex<Vec<Submission>>,
    rejection: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub(super) fn rejecting(reason: &str) -> Self {
        let transport = Self::default();
        transport.reject_with(Some(reason));
        transport
    }

    pub(super) fn reject_with(&self, reason: Option<&str>) {
        *self.rejection.lock().expect("rejection mutex") = reason.map(str::to_string);
    }

    pub(super) fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().expect("submission mutex").clone()
    }
}

impl MailTransport for RecordingTransport {
    fn submit(&self, credentials: &SendCredentials, mail: &OutboundMail) -> Result<(), SendError> {
        if let Some(reason) = self.rejection.lock().expect("rejection mutex").clone() {
            return Err(SendError::Transport(reason));
        }

        let raw = String::from_utf8_lossy(&mail.formatted()).into_owned();
        self.submissions
            .lock()
            .expect("submission mutex")
            .push(Submission {
                sender: credentials.address().to_string(),
                recipient: mail.recipient().to_string(),
                raw,
            });
        Ok(())
    }
}

pub(super) fn credentials() -> SendCredentials {
    SendCredentials::new("sam@example.com", "abcd efgh ijkl mnop").expect("credentials")
}

pub(super) fn resume() -> Attachment {
    Attachment::new("Sam_Lee_Resume.pdf", b"%PDF-1.7 sample".to_vec())
}

pub(super) fn session(
    query: &str,
    transport: Arc<RecordingTransport>,
) -> OutreachSession<RecordingTransport> {
    let table = ContactTable::from_bytes(RECRUITERS.as_bytes()).expect("fixture parses");
    let query = SkillQuery::parse(query).expect("query parses");
    let matches = match_contacts(&query, &table).expect("fixture matches");
    OutreachSession::new(matches, MessageTemplate::default(), transport).with_sender_name("Sam Lee")
}

pub(super) fn ready_session(
    query: &str,
    transport: Arc<RecordingTransport>,
) -> OutreachSession<RecordingTransport> {
    let mut session = session(query, transport);
    session.set_credentials(Some(credentials()));
    session.set_attachment(Some(resume()));
    session
}
