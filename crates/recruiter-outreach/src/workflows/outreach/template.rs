use std::path::Path;

use super::domain::{MatchResult, MessageDraft};

pub const SUBJECT_PREFIX: &str = "Job Inquiry - ";

const DEFAULT_TEMPLATE: &str = "
Hi {{ name }},

I came across your profile at {{ company }} regarding the {{ role }} position.
I have experience in {{ skills_list }} and believe my expertise could contribute to your team at {{ company }}.

I am very interested in any current or upcoming opportunities in this role and would love to connect for a quick chat.

Looking forward to your response!

Best regards,
{{ sender_name }}
";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{{ {name} }}}}' (expected name, company, role, skills_list or sender_name)")]
    UnknownPlaceholder { name: String },
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    RecipientName,
    Company,
    Role,
    SkillsList,
    SenderName,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::RecipientName),
            "company" => Some(Self::Company),
            "role" => Some(Self::Role),
            "skills_list" => Some(Self::SkillsList),
            "sender_name" => Some(Self::SenderName),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Values substituted into a template. Anything left empty renders as "".
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub recipient_name: &'a str,
    pub company: &'a str,
    pub role: &'a str,
    pub skills_list: &'a str,
    pub sender_name: &'a str,
}

impl<'a> RenderContext<'a> {
    fn value(&self, placeholder: Placeholder) -> &'a str {
        match placeholder {
            Placeholder::RecipientName => self.recipient_name,
            Placeholder::Company => self.company,
            Placeholder::Role => self.role,
            Placeholder::SkillsList => self.skills_list,
            Placeholder::SenderName => self.sender_name,
        }
    }
}

/// Outreach body with `{{ name }}`-style placeholders, parsed once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).expect("built-in template is well formed")
    }
}

impl MessageTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut consumed = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }

            let after_open = &rest[start + 2..];
            let end = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated {
                    offset: consumed + start,
                })?;

            let name = after_open[..end].trim();
            let placeholder =
                Placeholder::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                    name: name.to_string(),
                })?;
            segments.push(Segment::Field(placeholder));

            let advance = start + 2 + end + 2;
            consumed += advance;
            rest = &rest[advance..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn render(&self, context: &RenderContext<'_>) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Field(placeholder) => output.push_str(context.value(*placeholder)),
            }
        }
        output
    }

    /// Body, subject and recipient for one matched recruiter.
    pub fn draft(&self, matched: &MatchResult, sender_name: &str) -> MessageDraft {
        let skills_list = matched.skills_phrase();
        let record = &matched.record;
        let body = self.render(&RenderContext {
            recipient_name: record.full_name(),
            company: record.company(),
            role: record.role(),
            skills_list: &skills_list,
            sender_name,
        });

        MessageDraft {
            recipient: record.email().to_string(),
            subject: subject_line(&skills_list),
            body,
        }
    }
}

pub fn subject_line(skills_phrase: &str) -> String {
    format!("{SUBJECT_PREFIX}{}", title_case(skills_phrase))
}

/// Upper-cases the first letter of every run of letters and lower-cases the
/// rest, so `"node.js, c#"` becomes `"Node.Js, C#"`.
pub fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut in_word = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            output.push(ch);
            in_word = false;
        }
    }

    output
}
