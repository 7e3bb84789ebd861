use tracing::debug;

use super::domain::{MatchError, MatchResult, SkillQuery};
use crate::workflows::contacts::{ContactRecord, ContactTable};

/// Stable filter of `table` by `query`. An empty result is reported as
/// [`MatchError::NoMatch`] so callers can stop the workflow there.
pub fn match_contacts(
    query: &SkillQuery,
    table: &ContactTable,
) -> Result<Vec<MatchResult>, MatchError> {
    let matches: Vec<MatchResult> = table
        .records()
        .iter()
        .filter_map(|record| match_record(query, record))
        .collect();

    debug!(
        query = %query,
        scanned = table.len(),
        matched = matches.len(),
        "skill filter applied"
    );

    if matches.is_empty() {
        return Err(MatchError::NoMatch {
            query: query.phrase(),
        });
    }

    Ok(matches)
}

/// Tokens that occur, case-insensitively, in the record's role or skills text.
pub fn matching_tokens(query: &SkillQuery, record: &ContactRecord) -> Vec<String> {
    let role = record.role().to_lowercase();
    let skills = record.skills().to_lowercase();

    query
        .tokens()
        .iter()
        .filter(|token| role.contains(token.as_str()) || skills.contains(token.as_str()))
        .cloned()
        .collect()
}

fn match_record(query: &SkillQuery, record: &ContactRecord) -> Option<MatchResult> {
    let matched_skills = matching_tokens(query, record);
    if matched_skills.is_empty() {
        return None;
    }

    Some(MatchResult {
        record: record.clone(),
        matched_skills,
    })
}
