use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use steam_review_report::domain::AppId;
use steam_review_report::error::ReportError;
use steam_review_report::input::read_app_ids;

#[test]
fn reads_ids_from_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("appId.csv")).unwrap();
    std::fs::write(path.as_std_path(), "620\n\n 570 ,Dota 2\n").unwrap();

    let ids = read_app_ids(&path).unwrap();
    assert_eq!(ids, vec![AppId::new(620), AppId::new(570)]);
}

#[test]
fn missing_file_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.csv")).unwrap();

    let err = read_app_ids(&path).unwrap_err();
    assert_matches!(err, ReportError::InputRead { ref message, .. } if !message.is_empty());
    assert!(err.to_string().contains("absent.csv"));
    assert!(err.is_input_error());
}

#[test]
fn header_row_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("appId.csv")).unwrap();
    std::fs::write(path.as_std_path(), "AppId\n620\n").unwrap();

    let err = read_app_ids(&path).unwrap_err();
    assert_matches!(err, ReportError::InputParse { row: 1, .. });
}
