// Primitives for reading candidate lists from CSV files.

use serde::Deserialize;

use crate::desk::*;

/// A line of a candidate file. The header must name the columns `name` and `party`;
/// other columns are ignored.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct RosterLine {
    pub name: String,
    pub party: String,
}

pub fn read_csv_roster(path: &str) -> DeskResult<Vec<RosterLine>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<RosterLine> = Vec::new();
    for (idx, line_r) in rdr.deserialize::<RosterLine>().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_roster: lineno: {:?} line: {:?}", lineno, line);
        res.push(line);
    }
    info!("read_csv_roster: {} candidates in {}", res.len(), path);
    Ok(res)
}
