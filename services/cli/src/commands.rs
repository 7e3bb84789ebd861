use crate::cli::{LoadArgs, MatchArgs, OutputFormat, PreviewArgs, QueryArgs, SendArgs};
use crate::console::{run_send_loop, TerminalPrompt};
use recruiter_outreach::config::AppConfig;
use recruiter_outreach::error::AppError;
use recruiter_outreach::workflows::contacts::ContactTable;
use recruiter_outreach::workflows::outreach::{
    match_contacts, Attachment, MatchResult, MessageTemplate, OutreachSession, SendCredentials,
    SkillQuery, SmtpRelay,
};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
struct MatchView<'a> {
    position: usize,
    name: &'a str,
    company: &'a str,
    role: &'a str,
    email: &'a str,
    matched_skills: &'a [String],
}

pub(crate) fn run_load(args: LoadArgs) -> Result<(), AppError> {
    let table = ContactTable::from_path(&args.contacts)?;
    info!(path = %args.contacts.display(), rows = table.len(), "contacts loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_table_preview(&table, args.preview, &mut out)?;
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let matches = load_matches(&args.query)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => write_matches(&matches, &mut out)?,
        OutputFormat::Json => write_matches_json(&matches, &mut out)?,
    }
    Ok(())
}

pub(crate) fn run_preview(args: PreviewArgs, config: &AppConfig) -> Result<(), AppError> {
    let matches = load_matches(&args.query)?;
    let template = load_template(&args)?;
    let sender_name = sender_name(&args, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_matches(&matches, &mut out)?;
    for matched in &matches {
        let draft = template.draft(matched, &sender_name);
        writeln!(out, "\n=== {}", matched.heading())?;
        writeln!(out, "To: {}", draft.recipient)?;
        writeln!(out, "Subject: {}", draft.subject)?;
        writeln!(out, "{}", draft.body)?;
    }
    Ok(())
}

pub(crate) fn run_send(args: SendArgs, config: &AppConfig) -> Result<(), AppError> {
    let SendArgs {
        preview,
        sender_email,
        resume,
    } = args;

    let matches = load_matches(&preview.query)?;
    let template = load_template(&preview)?;
    let sender_name = sender_name(&preview, config);

    let sender_email = sender_email.or_else(|| config.mail.sender_email.clone());
    let credentials = match (sender_email.clone(), config.mail.password.clone()) {
        (Some(address), Some(password)) => SendCredentials::new(address, password),
        _ => None,
    };
    let attachment = resume.map(Attachment::from_path).transpose()?;

    let relay = Arc::new(SmtpRelay::from_config(&config.mail));
    let mut session = OutreachSession::new(matches, template, relay).with_sender_name(sender_name);
    session.set_credentials(credentials);
    session.set_attachment(attachment);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_send_loop(
        &mut session,
        sender_email,
        stdin.lock(),
        &mut TerminalPrompt,
        &mut out,
    )?;
    Ok(())
}

fn load_matches(args: &QueryArgs) -> Result<Vec<MatchResult>, AppError> {
    let table = ContactTable::from_path(&args.contacts)?;
    info!(path = %args.contacts.display(), rows = table.len(), "contacts loaded");

    let query = SkillQuery::parse(&args.skills)?;
    Ok(match_contacts(&query, &table)?)
}

fn load_template(args: &PreviewArgs) -> Result<MessageTemplate, AppError> {
    match &args.template {
        Some(path) => Ok(MessageTemplate::from_path(path)?),
        None => Ok(MessageTemplate::default()),
    }
}

fn sender_name(args: &PreviewArgs, config: &AppConfig) -> String {
    args.sender_name
        .clone()
        .or_else(|| config.mail.sender_name.clone())
        .unwrap_or_default()
}

pub(crate) fn write_table_preview<W: Write>(
    table: &ContactTable,
    rows: usize,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Loaded {} recruiters from CSV.", table.len())?;
    if table.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}", table.headers().join(" | "))?;
    for record in table.preview(rows) {
        let cells: Vec<&str> = table
            .headers()
            .iter()
            .map(|header| record.get(header))
            .collect();
        writeln!(out, "{}", cells.join(" | "))?;
    }
    Ok(())
}

pub(crate) fn write_matches<W: Write>(matches: &[MatchResult], out: &mut W) -> io::Result<()> {
    writeln!(out, "Found {} matching recruiters!", matches.len())?;
    for (position, matched) in matches.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} <{}> [{}]",
            position + 1,
            matched.heading(),
            matched.record.email(),
            matched.skills_phrase()
        )?;
    }
    Ok(())
}

fn write_matches_json<W: Write>(matches: &[MatchResult], out: &mut W) -> Result<(), AppError> {
    let views: Vec<MatchView<'_>> = matches
        .iter()
        .enumerate()
        .map(|(position, matched)| MatchView {
            position: position + 1,
            name: matched.record.full_name(),
            company: matched.record.company(),
            role: matched.record.role(),
            email: matched.record.email(),
            matched_skills: &matched.matched_skills,
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &views)?;
    writeln!(out)?;
    Ok(())
}
