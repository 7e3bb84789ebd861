use super::normalizer::normalize_header;
use super::ContactImportError;
use std::io::Read;

pub(crate) struct ParsedTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<(String, String)>>,
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<ParsedTable, ContactImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.is_empty() {
        return Err(ContactImportError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        // A wide row would shift cells under the wrong headers.
        if record.len() > headers.len() {
            return Err(ContactImportError::RowWidth {
                line: record.position().map_or(0, |position| position.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        // Short rows leave trailing columns out; readers fall back to "".
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(fields);
    }

    Ok(ParsedTable { headers, rows })
}
