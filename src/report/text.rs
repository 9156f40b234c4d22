use std::fmt::Write;

use crate::core::types::{Report, ScanRecord, Section};
use crate::report::{column_widths, ReportFormat, NO_DATA_LINE};

const SEPARATOR_WIDTH: usize = 60;
const FREE_TEXT_MARGIN: &str = "    ";

/// Fixed-width text tables, suitable for the terminal and the persisted
/// `.txt` report.
pub struct TextFormat;

impl ReportFormat for TextFormat {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn preamble(&self, out: &mut String, report: &Report) {
        let _ = writeln!(out, "SnapAudit Report - {}", report.timestamp());
        let _ = writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH));
    }

    fn section_header(&self, out: &mut String, section: &Section) {
        let _ = writeln!(out, "\n[ {} ]", section.name.to_uppercase());
        let _ = writeln!(out, "{}", "-".repeat(section.name.chars().count() + 4));
    }

    fn table(
        &self,
        out: &mut String,
        _section: &Section,
        columns: &[String],
        records: &[ScanRecord],
    ) {
        let widths = column_widths(columns, records);

        let border: String = format!(
            "+-{}-+",
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-")
        );

        let _ = writeln!(out, "{}", border);
        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, w)| pad(column, *w))
            .collect();
        let _ = writeln!(out, "| {} |", header.join(" | "));
        let _ = writeln!(out, "{}", border);

        for record in records {
            let cells: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(column, w)| pad(record.get(column), *w))
                .collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
        let _ = writeln!(out, "{}", border);
    }

    fn empty_section(&self, out: &mut String, _section: &Section) {
        let _ = writeln!(out, "{}", NO_DATA_LINE);
    }

    fn free_text(&self, out: &mut String, _section: &Section, text: &str) {
        for line in text.lines() {
            let _ = writeln!(out, "{}{}", FREE_TEXT_MARGIN, line);
        }
    }

    fn section_footer(&self, _out: &mut String, _section: &Section) {}

    fn postamble(&self, out: &mut String, report: &Report) {
        let _ = writeln!(out, "\n{}", "=".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(out, "Report generato il: {}", report.timestamp());
    }
}

/// Left-justified padding by character count, matching the width computation.
fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut padded = String::with_capacity(width);
    padded.push_str(value);
    for _ in len..width {
        padded.push(' ');
    }
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::render;

    fn services_section() -> Section {
        let records = vec![
            ScanRecord::new()
                .with("UNIT", "cron.service")
                .with("SUB", "running"),
            ScanRecord::new()
                .with("UNIT", "ssh.service")
                .with("SUB", "running"),
        ];
        Section::structured("Servizi Attivi", records).unwrap()
    }

    #[test]
    fn all_table_lines_share_the_same_width() {
        let mut report = Report::new();
        report.push(services_section());
        let rendered = render(&report, &TextFormat);

        let table_lines: Vec<&str> = rendered
            .lines()
            .filter(|l| l.starts_with('+') || l.starts_with('|'))
            .collect();
        // border, header, border, 2 rows, border
        assert_eq!(table_lines.len(), 6);
        let width = table_lines[0].chars().count();
        for line in &table_lines {
            assert_eq!(line.chars().count(), width);
        }
    }

    #[test]
    fn cells_are_left_justified_to_column_width() {
        let mut report = Report::new();
        report.push(services_section());
        let rendered = render(&report, &TextFormat);

        // "UNIT" header padded to the longest cell, "cron.service" (12 chars)
        assert!(rendered.contains("| UNIT         | SUB     |"));
        assert!(rendered.contains("| cron.service | running |"));
        assert!(rendered.contains("| ssh.service  | running |"));
    }

    #[test]
    fn empty_section_never_emits_a_table_skeleton() {
        let mut report = Report::new();
        report.push(Section::structured("Porte Aperte", Vec::new()).unwrap());
        let rendered = render(&report, &TextFormat);

        assert!(rendered.contains(NO_DATA_LINE));
        assert!(!rendered.contains('+'));
        assert!(!rendered.contains('|'));
    }

    #[test]
    fn section_banner_is_uppercased_and_underlined() {
        let mut report = Report::new();
        report.push(services_section());
        let rendered = render(&report, &TextFormat);

        assert!(rendered.contains("[ SERVIZI ATTIVI ]"));
        assert!(rendered.contains(&"-".repeat("Servizi Attivi".len() + 4)));
    }

    #[test]
    fn free_text_is_indented_verbatim() {
        let mut report = Report::new();
        report.push(Section::free_text("Note", "prima riga\nseconda riga"));
        let rendered = render(&report, &TextFormat);

        assert!(rendered.contains("    prima riga\n    seconda riga\n"));
    }

    #[test]
    fn report_opens_and_closes_with_timestamped_banner() {
        let report = Report::new();
        let rendered = render(&report, &TextFormat);
        let ts = report.timestamp();

        assert!(rendered.starts_with(&format!("SnapAudit Report - {}", ts)));
        assert!(rendered.trim_end().ends_with(&format!("Report generato il: {}", ts)));
        assert!(rendered.contains(&"=".repeat(60)));
    }
}
