//! Roster import from CSV: one player name per row, first column.

use std::io::Read;

/// Read player names from CSV. A leading `name` header row is skipped, as are blank names.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut names = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let Some(name) = record.get(0) else {
            continue;
        };
        if name.is_empty() || (row == 0 && name.eq_ignore_ascii_case("name")) {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}
