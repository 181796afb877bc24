use std::fs::File;
use std::io::Read;

use camino::Utf8Path;

use crate::domain::AppId;
use crate::error::ReportError;

/// Reads the app id list: one id in the first column of each CSV row, no header.
///
/// Any unreadable or unparsable row aborts the whole read.
pub fn read_app_ids(path: &Utf8Path) -> Result<Vec<AppId>, ReportError> {
    let file = File::open(path.as_std_path()).map_err(|err| ReportError::InputRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    read_app_ids_from(file)
}

pub fn read_app_ids_from<R: Read>(source: R) -> Result<Vec<AppId>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut ids = Vec::new();
    // Rows are reported by file line; the reader skips blank lines.
    for record in reader.records() {
        let record = record.map_err(|err| ReportError::InputParse {
            row: err.position().map(|pos| pos.line()).unwrap_or(0),
            message: err.to_string(),
        })?;
        let row = record.position().map(|pos| pos.line()).unwrap_or(0);
        let field = record.get(0).unwrap_or("");
        let id = field.parse::<AppId>().map_err(|_| ReportError::InputParse {
            row,
            message: format!("first field {field:?} is not an app id"),
        })?;
        ids.push(id);
    }
    Ok(ids)
}
