use std::path::PathBuf;

use tempfile::TempDir;

/// Build an xlsx fixture with umya and return it alongside the directory
/// keeping it alive.
pub fn build_workbook(build: impl FnOnce(&mut umya_spreadsheet::Spreadsheet)) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fixture.xlsx");
    let mut book = umya_spreadsheet::new_file();
    build(&mut book);
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture");
    (dir, path)
}
