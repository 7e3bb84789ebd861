//! Recruiter contact table loading.
//!
//! The loader only checks that the input is readable delimited text with a
//! header row and that no row is wider than that header. No column is required; every accessor on [`ContactRecord`]
//! reads an absent column as empty text.

mod normalizer;
mod parser;

use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

pub const FULL_NAME_COLUMN: &str = "Full Name";
pub const COMPANY_COLUMN: &str = "Company Name";
pub const ROLE_COLUMN: &str = "role";
pub const SKILLS_COLUMN: &str = "skills";
pub const EMAIL_COLUMN: &str = "email";

#[derive(Debug)]
pub enum ContactImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingHeader,
    RowWidth {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for ContactImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactImportError::Io(err) => write!(f, "failed to read contact table: {}", err),
            ContactImportError::Csv(err) => write!(f, "invalid contact CSV data: {}", err),
            ContactImportError::MissingHeader => write!(f, "contact CSV has no header row"),
            ContactImportError::RowWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected at most {} fields, saw {}",
                line, expected, found
            ),
        }
    }
}

impl std::error::Error for ContactImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContactImportError::Io(err) => Some(err),
            ContactImportError::Csv(err) => Some(err),
            ContactImportError::MissingHeader | ContactImportError::RowWidth { .. } => None,
        }
    }
}

impl From<std::io::Error> for ContactImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ContactImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One recruiter row, keyed by header name in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactRecord {
    fields: Vec<(String, String)>,
}

impl ContactRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Case-sensitive column lookup. The first column with a given name wins.
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn full_name(&self) -> &str {
        self.get(FULL_NAME_COLUMN)
    }

    pub fn company(&self) -> &str {
        self.get(COMPANY_COLUMN)
    }

    pub fn role(&self) -> &str {
        self.get(ROLE_COLUMN)
    }

    pub fn skills(&self) -> &str {
        self.get(SKILLS_COLUMN)
    }

    pub fn email(&self) -> &str {
        self.get(EMAIL_COLUMN)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Ordered, immutable view of an uploaded contact file.
#[derive(Debug, Clone, Default)]
pub struct ContactTable {
    headers: Vec<String>,
    records: Vec<ContactRecord>,
}

impl ContactTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ContactImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContactImportError> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ContactImportError> {
        let parsed = parser::parse_table(reader)?;
        let records: Vec<ContactRecord> = parsed
            .rows
            .into_iter()
            .map(|fields| ContactRecord { fields })
            .collect();

        debug!(
            columns = parsed.headers.len(),
            rows = records.len(),
            "contact table parsed"
        );

        Ok(Self {
            headers: parsed.headers,
            records,
        })
    }

    pub fn from_records(headers: Vec<String>, records: Vec<ContactRecord>) -> Self {
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `rows` records, or the whole table when it is shorter.
    pub fn preview(&self, rows: usize) -> &[ContactRecord] {
        &self.records[..rows.min(self.records.len())]
    }
}
