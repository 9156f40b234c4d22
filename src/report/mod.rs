pub mod html;
pub mod text;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glob::glob;

use crate::core::types::{Report, ScanRecord, Section, SectionPayload};
use crate::core::SnapResult;
use crate::utils::{log_message, LogLevel};

pub use html::HtmlFormat;
pub use text::TextFormat;

/// Line emitted for a section that produced no records.
pub const NO_DATA_LINE: &str = "Nessun dato trovato per questa sezione.";

/// Prefix shared by every persisted report file name.
pub const REPORT_FILE_PREFIX: &str = "snap_report_";

/// One output format of a report.
///
/// The walk over sections, records and columns lives in [`render`] and runs
/// exactly once per report; formats implement only the leaf formatting.
pub trait ReportFormat {
    fn extension(&self) -> &'static str;

    fn preamble(&self, out: &mut String, report: &Report);
    fn section_header(&self, out: &mut String, section: &Section);
    fn table(&self, out: &mut String, section: &Section, columns: &[String], records: &[ScanRecord]);
    fn empty_section(&self, out: &mut String, section: &Section);
    fn free_text(&self, out: &mut String, section: &Section, text: &str);
    fn section_footer(&self, out: &mut String, section: &Section);
    fn postamble(&self, out: &mut String, report: &Report);
}

/// Renders a report through one format. Sections appear in request order;
/// an empty record sequence never produces a table skeleton.
pub fn render<F: ReportFormat>(report: &Report, format: &F) -> String {
    let mut out = String::new();
    format.preamble(&mut out, report);
    for section in report.sections() {
        format.section_header(&mut out, section);
        match &section.payload {
            SectionPayload::Records(records) if records.is_empty() => {
                format.empty_section(&mut out, section);
            }
            SectionPayload::Records(records) => {
                let columns: Vec<String> =
                    records[0].columns().iter().map(|c| c.to_string()).collect();
                format.table(&mut out, section, &columns, records);
            }
            SectionPayload::FreeText(text) => format.free_text(&mut out, section, text),
        }
        format.section_footer(&mut out, section);
    }
    format.postamble(&mut out, report);
    out
}

/// Per-column width: max of the header length and every cell length.
/// Derived per render, never persisted.
pub(crate) fn column_widths(columns: &[String], records: &[ScanRecord]) -> Vec<usize> {
    columns
        .iter()
        .map(|column| {
            let mut width = column.chars().count();
            for record in records {
                width = width.max(record.get(column).chars().count());
            }
            width
        })
        .collect()
}

/// Renders and persists a report inside `output_dir`, creating the directory
/// if absent. The file name embeds the report timestamp to the second.
/// This is the one operation whose failure surfaces to the caller.
pub fn write_report<F: ReportFormat>(
    report: &Report,
    format: &F,
    output_dir: &Path,
) -> SnapResult<PathBuf> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
        log_message(
            LogLevel::Info,
            &format!("Creata directory di output: {}", output_dir.display()),
        );
    }

    let filename = format!(
        "{}{}.{}",
        REPORT_FILE_PREFIX,
        report.timestamp(),
        format.extension()
    );
    let path = output_dir.join(filename);
    fs::write(&path, render(report, format))?;
    Ok(path)
}

/// Finds the most recently modified report with the given extension inside
/// `output_dir`. Directory listing plus mtime comparison is the only lookup
/// mechanism; there is no manifest.
pub fn find_latest_report(output_dir: &Path, extension: &str) -> Option<PathBuf> {
    let pattern = output_dir
        .join(format!("{}*.{}", REPORT_FILE_PREFIX, extension))
        .to_string_lossy()
        .into_owned();

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for path in glob(&pattern).ok()?.flatten() {
        let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) else {
            continue;
        };
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, path));
        }
    }
    latest.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let mut report = Report::new();
        let records = vec![
            ScanRecord::new().with("UNIT", "cron.service").with("SUB", "running"),
            ScanRecord::new().with("UNIT", "ssh.service").with("SUB", "running"),
        ];
        report.push(Section::structured("Servizi Attivi", records).unwrap());
        report.push(Section::structured("Porte Aperte", Vec::new()).unwrap());
        report
    }

    #[test]
    fn widths_cover_header_and_longest_cell() {
        let records = vec![
            ScanRecord::new().with("UNIT", "cron.service").with("SUB", "x"),
            ScanRecord::new().with("UNIT", "a").with("SUB", "running"),
        ];
        let columns = vec!["UNIT".to_string(), "SUB".to_string()];
        assert_eq!(column_widths(&columns, &records), vec![12, 7]);
    }

    #[test]
    fn header_length_wins_over_short_cells() {
        let records = vec![ScanRecord::new().with("DESCRIPTION", "x")];
        let columns = vec!["DESCRIPTION".to_string()];
        assert_eq!(column_widths(&columns, &records), vec![11]);
    }

    #[test]
    fn write_report_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("not").join("yet").join("there");

        let path = write_report(&sample_report(), &TextFormat, &nested).unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(REPORT_FILE_PREFIX));
        assert!(path.extension().unwrap() == "txt");
    }

    #[test]
    fn latest_report_is_picked_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("snap_report_2024-01-01_00-00-00.txt");
        let new = dir.path().join("snap_report_2024-06-01_00-00-00.txt");
        fs::write(&old, "old").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&new, "new").unwrap();

        assert_eq!(find_latest_report(dir.path(), "txt"), Some(new));
    }

    #[test]
    fn latest_report_ignores_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("snap_report_2024-01-01_00-00-00.html"), "x").unwrap();

        assert_eq!(find_latest_report(dir.path(), "txt"), None);
    }
}
