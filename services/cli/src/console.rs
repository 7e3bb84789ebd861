use recruiter_outreach::workflows::outreach::{
    MailTransport, OutreachSession, SendCredentials, SendState,
};
use std::io::{self, BufRead, Write};

/// Source of the app password when it was not configured up front.
pub(crate) trait SecretPrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal with echo turned off.
#[derive(Debug, Default)]
pub(crate) struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleCommand {
    List,
    Preview(usize),
    Send(usize),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("");

    let command = match head.to_ascii_lowercase().as_str() {
        "" | "l" | "list" => ConsoleCommand::List,
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        "h" | "help" | "?" => ConsoleCommand::Help,
        "p" | "preview" => ConsoleCommand::Preview(parts.next()?.parse().ok()?),
        "s" | "send" => ConsoleCommand::Send(parts.next()?.parse().ok()?),
        other => ConsoleCommand::Send(other.parse().ok()?),
    };

    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

/// Reads one command per line until `q` or end of input. Positions are
/// 1-based on screen and each send is its own action.
///
/// A send without credentials first asks for them: the sender address on
/// `input` unless one is already known, then the password through `secrets`.
pub(crate) fn run_send_loop<T, R, S, W>(
    session: &mut OutreachSession<T>,
    sender_address: Option<String>,
    input: R,
    secrets: &mut S,
    out: &mut W,
) -> io::Result<()>
where
    T: MailTransport,
    R: BufRead,
    S: SecretPrompt,
    W: Write,
{
    let mut sender_address = sender_address.filter(|address| !address.trim().is_empty());
    write_listing(session, out)?;
    write_help(out)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line?;
        let Some(command) = parse_command(&line) else {
            writeln!(out, "Unrecognised command '{}'. Type h for help.", line.trim())?;
            continue;
        };

        match command {
            ConsoleCommand::List => write_listing(session, out)?,
            ConsoleCommand::Help => write_help(out)?,
            ConsoleCommand::Quit => break,
            ConsoleCommand::Preview(position) => match position
                .checked_sub(1)
                .and_then(|index| session.draft(index))
            {
                Some(draft) => {
                    writeln!(out, "To: {}", draft.recipient)?;
                    writeln!(out, "Subject: {}", draft.subject)?;
                    writeln!(out, "{}", draft.body)?;
                }
                None => writeln!(out, "No matched recruiter at position {position}.")?,
            },
            ConsoleCommand::Send(position) => {
                let Some(index) = position
                    .checked_sub(1)
                    .filter(|index| *index < session.len())
                else {
                    writeln!(out, "No matched recruiter at position {position}.")?;
                    continue;
                };
                if !session.has_credentials() {
                    ask_for_credentials(session, &mut sender_address, &mut lines, secrets, out)?;
                }
                match session.send(index) {
                    Ok(receipt) => writeln!(
                        out,
                        "Email sent to {} <{}> at {}",
                        receipt.recipient_name,
                        receipt.recipient,
                        receipt.sent_at.format("%H:%M:%S")
                    )?,
                    Err(err) => writeln!(out, "{err}")?,
                }
            }
        }
    }

    Ok(())
}

fn ask_for_credentials<T, I, S, W>(
    session: &mut OutreachSession<T>,
    sender_address: &mut Option<String>,
    lines: &mut I,
    secrets: &mut S,
    out: &mut W,
) -> io::Result<()>
where
    T: MailTransport,
    I: Iterator<Item = io::Result<String>>,
    S: SecretPrompt,
    W: Write,
{
    let address = match sender_address.clone() {
        Some(address) => address,
        None => {
            write!(out, "Sender email: ")?;
            out.flush()?;
            match lines.next().transpose()? {
                Some(line) if !line.trim().is_empty() => line.trim().to_string(),
                _ => return Ok(()),
            }
        }
    };

    let secret = match secrets.read_secret(&format!("App password for {address}: ")) {
        Ok(secret) => secret,
        Err(err) => {
            writeln!(out, "Could not read the app password: {err}")?;
            return Ok(());
        }
    };

    session.set_credentials(SendCredentials::new(address.clone(), secret));
    if session.has_credentials() {
        *sender_address = Some(address);
    }
    Ok(())
}

fn write_listing<T: MailTransport, W: Write>(
    session: &OutreachSession<T>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{} matched recruiters:", session.len())?;
    for (index, (matched, state)) in session
        .matches()
        .iter()
        .zip(session.states())
        .enumerate()
    {
        let detail = match state {
            SendState::Failed { reason } => format!(" ({reason})"),
            _ => String::new(),
        };
        writeln!(
            out,
            "{:>3}. {} [{}]{}",
            index + 1,
            matched.heading(),
            state.label(),
            detail
        )?;
    }
    Ok(())
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Commands: <n> send to recruiter n | p <n> preview | l list | q quit"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruiter_outreach::workflows::contacts::ContactTable;
    use recruiter_outreach::workflows::outreach::{
        match_contacts, Attachment, MessageTemplate, OutboundMail, SendError, SkillQuery,
    };
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct StubRelay {
        sent: Mutex<Vec<String>>,
        fail_login: bool,
    }

    impl StubRelay {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().expect("sent mutex").clone()
        }
    }

    impl MailTransport for StubRelay {
        fn submit(
            &self,
            _credentials: &SendCredentials,
            mail: &OutboundMail,
        ) -> Result<(), SendError> {
            if self.fail_login {
                return Err(SendError::Transport(
                    "permanent error (535): authentication failed".to_string(),
                ));
            }
            self.sent
                .lock()
                .expect("sent mutex")
                .push(mail.recipient().to_string());
            Ok(())
        }
    }

    /// Hands out canned passwords and records every prompt it was shown.
    #[derive(Debug, Default)]
    struct ScriptedSecrets {
        answers: Vec<String>,
        prompts: Vec<String>,
    }

    impl ScriptedSecrets {
        fn answering(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|answer| answer.to_string()).collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl SecretPrompt for ScriptedSecrets {
        fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
            self.prompts.push(prompt.to_string());
            if self.answers.is_empty() {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no terminal"));
            }
            Ok(self.answers.remove(0))
        }
    }

    fn session(
        relay: Arc<StubRelay>,
        credentials: bool,
        attachment: bool,
    ) -> OutreachSession<StubRelay> {
        let table = ContactTable::from_bytes(
            b"Full Name,Company Name,role,skills,email\n\
Ada Park,Initech,Rust Engineer,rust,ada@initech.example\n\
Ben Ortiz,Globex,Platform Engineer,\"rust, go\",ben@globex.example\n",
        )
        .expect("fixture parses");
        let query = SkillQuery::parse("rust").expect("query");
        let matches = match_contacts(&query, &table).expect("matches");
        let mut session =
            OutreachSession::new(matches, MessageTemplate::default(), relay).with_sender_name("Sam");
        if credentials {
            session.set_credentials(SendCredentials::new("sam@example.com", "pw"));
        }
        if attachment {
            session.set_attachment(Some(Attachment::new("cv.pdf", b"%PDF".to_vec())));
        }
        session
    }

    fn drive(
        session: &mut OutreachSession<StubRelay>,
        sender_address: Option<&str>,
        secrets: &mut ScriptedSecrets,
        script: &str,
    ) -> String {
        let mut out = Vec::new();
        run_send_loop(
            session,
            sender_address.map(str::to_string),
            Cursor::new(script.to_string()),
            secrets,
            &mut out,
        )
        .expect("loop runs");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn parses_console_commands() {
        assert_eq!(parse_command(""), Some(ConsoleCommand::List));
        assert_eq!(parse_command(" 2 "), Some(ConsoleCommand::Send(2)));
        assert_eq!(parse_command("send 3"), Some(ConsoleCommand::Send(3)));
        assert_eq!(parse_command("p 1"), Some(ConsoleCommand::Preview(1)));
        assert_eq!(parse_command("Q"), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("p"), None);
        assert_eq!(parse_command("send all"), None);
        assert_eq!(parse_command("1 2"), None);
    }

    #[test]
    fn sends_only_the_selected_recipient() {
        let relay = Arc::new(StubRelay::default());
        let mut session = session(relay.clone(), true, true);
        let mut secrets = ScriptedSecrets::default();
        let output = drive(&mut session, None, &mut secrets, "2\nl\nq\n");

        assert_eq!(relay.sent(), vec!["ben@globex.example".to_string()]);
        assert!(secrets.prompts.is_empty());
        assert!(output.contains("Email sent to Ben Ortiz <ben@globex.example>"));
        assert!(output.contains("  1. Ada Park (Rust Engineer) at Initech [not sent]"));
        assert!(output.contains("  2. Ben Ortiz (Platform Engineer) at Globex [sent]"));
    }

    #[test]
    fn precondition_errors_are_printed_and_loop_continues() {
        let relay = Arc::new(StubRelay::default());
        let mut session = session(relay.clone(), false, false);
        let mut secrets = ScriptedSecrets::default();
        // A blank sender address skips the password prompt.
        let output = drive(&mut session, None, &mut secrets, "1\n\np 1\nq\n");

        assert!(output.contains("Sender email: "));
        assert!(output.contains("provide your sender email and app password before sending"));
        assert!(output.contains("Subject: Job Inquiry - Rust"));
        assert!(secrets.prompts.is_empty());
        assert!(relay.sent().is_empty());
    }

    #[test]
    fn missing_password_is_asked_for_once_and_reused() {
        let relay = Arc::new(StubRelay::default());
        let mut session = session(relay.clone(), false, true);
        let mut secrets = ScriptedSecrets::answering(&["app-password"]);
        let output = drive(
            &mut session,
            Some("sam@example.com"),
            &mut secrets,
            "1\n2\nq\n",
        );

        assert_eq!(
            secrets.prompts,
            vec!["App password for sam@example.com: ".to_string()]
        );
        assert_eq!(
            relay.sent(),
            vec![
                "ada@initech.example".to_string(),
                "ben@globex.example".to_string()
            ]
        );
        assert!(!output.contains("app-password"));
        assert!(session.has_credentials());
    }

    #[test]
    fn sender_address_can_be_typed_at_the_prompt() {
        let relay = Arc::new(StubRelay::default());
        let mut session = session(relay.clone(), false, true);
        let mut secrets = ScriptedSecrets::answering(&["pw"]);
        let output = drive(
            &mut session,
            None,
            &mut secrets,
            "1\nsam@example.com\nq\n",
        );

        assert!(output.contains("Sender email: "));
        assert!(output.contains("Email sent to Ada Park <ada@initech.example>"));
        assert_eq!(relay.sent(), vec!["ada@initech.example".to_string()]);
    }

    #[test]
    fn unreadable_or_blank_password_leaves_credentials_missing() {
        let relay = Arc::new(StubRelay::default());
        let mut session = session(relay.clone(), false, true);
        let mut secrets = ScriptedSecrets::answering(&["   "]);
        let output = drive(
            &mut session,
            Some("sam@example.com"),
            &mut secrets,
            "1\n1\nq\n",
        );

        assert_eq!(secrets.prompts.len(), 2);
        assert!(output.contains("Could not read the app password: no terminal"));
        assert_eq!(
            output
                .matches("provide your sender email and app password before sending")
                .count(),
            2
        );
        assert!(relay.sent().is_empty());
        assert_eq!(session.states()[0], SendState::Idle);
    }

    #[test]
    fn relay_rejection_is_reported_per_recipient() {
        let relay = Arc::new(StubRelay {
            fail_login: true,
            ..StubRelay::default()
        });
        let mut session = session(relay, true, true);
        let mut secrets = ScriptedSecrets::default();
        let output = drive(&mut session, None, &mut secrets, "1\nl\n");

        assert!(output.contains("error sending email: mail relay error: permanent error (535)"));
        assert!(output.contains("[failed] (mail relay error: permanent error (535)"));
        assert!(output.contains("  2. Ben Ortiz (Platform Engineer) at Globex [not sent]"));
    }

    #[test]
    fn out_of_range_positions_are_reported() {
        let relay = Arc::new(StubRelay::default());
        let mut session = session(relay, true, true);
        let mut secrets = ScriptedSecrets::default();
        let output = drive(&mut session, None, &mut secrets, "0\n9\np 5\nbogus\n");

        assert!(output.contains("No matched recruiter at position 0."));
        assert!(output.contains("No matched recruiter at position 9."));
        assert!(output.contains("No matched recruiter at position 5."));
        assert!(output.contains("Unrecognised command 'bogus'"));
    }
}
