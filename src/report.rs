use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::domain::EnrichedRecord;
use crate::error::ReportError;
use crate::format::{join_list, normalize_supported_languages};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    title: &'a str,
    genre: String,
    publisher: String,
    supported_languages: String,
    all_total_reviews: i64,
    all_total_positive: i64,
    all_total_negative: i64,
    target_total_reviews: i64,
    target_total_positive: i64,
    target_total_negative: i64,
    all_negative_ratio: Option<f64>,
    target_negative_ratio: Option<f64>,
    target_all_review_ratio: Option<f64>,
}

impl<'a> ReportRow<'a> {
    fn new(record: &'a EnrichedRecord, delimiter: char) -> Self {
        Self {
            title: &record.metadata.title,
            genre: join_list(&record.metadata.genres, delimiter),
            publisher: join_list(&record.metadata.publishers, delimiter),
            supported_languages: normalize_supported_languages(
                &record.metadata.supported_languages,
                delimiter,
            ),
            all_total_reviews: record.all_reviews.total_reviews,
            all_total_positive: record.all_reviews.total_positive,
            all_total_negative: record.all_reviews.total_negative,
            target_total_reviews: record.target_reviews.total_reviews,
            target_total_positive: record.target_reviews.total_positive,
            target_total_negative: record.target_reviews.total_negative,
            all_negative_ratio: record.ratios.all_negative,
            target_negative_ratio: record.ratios.target_negative,
            target_all_review_ratio: record.ratios.target_coverage,
        }
    }
}

/// Column names, with the target-language columns named after the language
/// (`japanese` -> `JapaneseTotalReviews`).
pub fn header(target_language: &str) -> Vec<String> {
    let lang = capitalize(target_language);
    vec![
        "Title".to_string(),
        "Genre".to_string(),
        "Publisher".to_string(),
        "SupportedLanguages".to_string(),
        "AllTotalReviews".to_string(),
        "AllTotalPositive".to_string(),
        "AllTotalNegative".to_string(),
        format!("{lang}TotalReviews"),
        format!("{lang}TotalPositive"),
        format!("{lang}TotalNegative"),
        "AllNegativeRatio".to_string(),
        format!("{lang}NegativeRatio"),
        format!("{lang}AllReviewRatio"),
    ]
}

pub fn write_report_to<W: Write>(
    writer: W,
    records: &[EnrichedRecord],
    target_language: &str,
    delimiter: char,
) -> Result<(), ReportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer
        .write_record(header(target_language))
        .map_err(|err| ReportError::ReportWrite(err.to_string()))?;
    for record in records {
        csv_writer
            .serialize(ReportRow::new(record, delimiter))
            .map_err(|err| ReportError::ReportWrite(err.to_string()))?;
    }
    csv_writer
        .flush()
        .map_err(|err| ReportError::ReportWrite(err.to_string()))?;
    Ok(())
}

/// Writes the whole report to `path` in one go, replacing any previous file.
pub fn write_report(
    path: &Utf8Path,
    records: &[EnrichedRecord],
    target_language: &str,
    delimiter: char,
) -> Result<(), ReportError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    std::fs::create_dir_all(parent.as_std_path())
        .map_err(|err| ReportError::Filesystem(err.to_string()))?;
    let mut temp = NamedTempFile::new_in(parent.as_std_path())
        .map_err(|err| ReportError::Filesystem(err.to_string()))?;
    write_report_to(temp.as_file_mut(), records, target_language, delimiter)?;
    temp.persist(path.as_std_path())
        .map_err(|err| ReportError::Filesystem(err.to_string()))?;
    Ok(())
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
