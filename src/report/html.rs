use std::fmt::Write;

use crate::core::types::{Report, ScanRecord, Section};
use crate::report::{ReportFormat, NO_DATA_LINE};

const PERMISSIONS_SECTION: &str = "Permessi File Critici";
const WARNING_COLUMN: &str = "Avviso di Sicurezza";

/// Inline stylesheet; the document is self-contained and fetches nothing.
const STYLE: &str = "\
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; margin: 0; padding: 20px; background-color: #e9ecef; color: #343a40; }
        .container { max-width: 1000px; margin: 20px auto; background: #fff; padding: 30px; border-radius: 10px; box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1); }
        h1 { color: #007bff; text-align: center; margin-bottom: 30px; padding-bottom: 10px; border-bottom: 2px solid #007bff; }
        .section { margin-bottom: 30px; padding: 15px; border-left: 5px solid #ccc; border-radius: 5px; background-color: #f8f9fa; }
        .section h2 { margin-top: 0; padding-bottom: 0; }
        .section.services { border-color: #28a745; background-color: #d4edda; color: #155724; }
        .section.ports { border-color: #dc3545; background-color: #f8d7da; color: #721c24; }
        .section.users { border-color: #ffc107; background-color: #fff3cd; color: #856404; }
        .section.files { border-color: #17a2b8; background-color: #d1ecf1; color: #0c5460; }
        .section.permissions { border-color: #6f42c1; background-color: #e2d9eb; color: #4f327f; }
        table { border-collapse: collapse; width: 100%; margin-top: 10px; }
        th, td { border: 1px solid #dee2e6; padding: 12px; text-align: left; }
        th { background-color: #007bff; color: white; font-weight: bold; }
        tr:nth-child(even) { background-color: #e9ecef; }
        pre { background-color: #e9ecef; padding: 15px; border: 1px solid #ced4da; overflow-x: auto; white-space: pre-wrap; word-wrap: break-word; border-radius: 5px; margin-top: 10px; }
        .info-text { font-size: 0.9em; color: #6c757d; margin-top: 20px; text-align: center; }
        .warning { color: #dc3545; font-weight: bold; }
        .ok { color: #28a745; }";

/// Styled, self-contained HTML document with one block per section.
pub struct HtmlFormat;

/// Fixed section-name -> CSS-class lookup; unknown names get no extra class.
/// The files section embeds the watched path in its name, so it matches by
/// prefix.
fn css_class(section_name: &str) -> Option<&'static str> {
    match section_name {
        "Servizi Attivi" => Some("services"),
        "Porte Aperte" => Some("ports"),
        "Utenti Loggati" => Some("users"),
        PERMISSIONS_SECTION => Some("permissions"),
        name if name.starts_with("Modifiche Recenti") => Some("files"),
        _ => None,
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Conditional styling for the security-warning cell of the permissions
/// section: "AVVISO:" marker -> warning, exact "OK" -> affirmative, anything
/// else neutral.
fn warning_cell(value: &str) -> String {
    let escaped = escape(value);
    if value.contains("AVVISO:") {
        format!("<span class='warning'>{}</span>", escaped)
    } else if value == "OK" {
        format!("<span class='ok'>{}</span>", escaped)
    } else {
        escaped
    }
}

impl ReportFormat for HtmlFormat {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn preamble(&self, out: &mut String, report: &Report) {
        let ts = report.timestamp();
        let _ = writeln!(out, "<!DOCTYPE html>");
        let _ = writeln!(out, "<html lang='it'>");
        let _ = writeln!(out, "<head>");
        let _ = writeln!(out, "    <meta charset='UTF-8'>");
        let _ = writeln!(
            out,
            "    <meta name='viewport' content='width=device-width, initial-scale=1.0'>"
        );
        let _ = writeln!(out, "    <title>SnapAudit Security Report - {}</title>", ts);
        let _ = writeln!(out, "    <style>\n{}\n    </style>", STYLE);
        let _ = writeln!(out, "</head>");
        let _ = writeln!(out, "<body>");
        let _ = writeln!(out, "    <div class='container'>");
        let _ = writeln!(out, "    <h1>SnapAudit Security Report</h1>");
        let _ = writeln!(out, "    <p class='info-text'>Report generato il: {}</p>", ts);
    }

    fn section_header(&self, out: &mut String, section: &Section) {
        let class = match css_class(&section.name) {
            Some(class) => format!(" {}", class),
            None => String::new(),
        };
        let _ = writeln!(out, "    <div class='section{}'>", class);
        let _ = writeln!(out, "    <h2>{}</h2>", escape(&section.name));
    }

    fn table(
        &self,
        out: &mut String,
        section: &Section,
        columns: &[String],
        records: &[ScanRecord],
    ) {
        let _ = writeln!(out, "    <table>");
        let _ = writeln!(out, "        <tr>");
        for column in columns {
            let _ = writeln!(out, "            <th>{}</th>", escape(column));
        }
        let _ = writeln!(out, "        </tr>");

        for record in records {
            let _ = writeln!(out, "        <tr>");
            for column in columns {
                let value = record.get(column);
                let cell = if section.name == PERMISSIONS_SECTION && column == WARNING_COLUMN {
                    warning_cell(value)
                } else {
                    escape(value)
                };
                let _ = writeln!(out, "            <td>{}</td>", cell);
            }
            let _ = writeln!(out, "        </tr>");
        }
        let _ = writeln!(out, "    </table>");
    }

    fn empty_section(&self, out: &mut String, _section: &Section) {
        let _ = writeln!(out, "    <p>{}</p>", NO_DATA_LINE);
    }

    fn free_text(&self, out: &mut String, _section: &Section, text: &str) {
        let _ = writeln!(out, "    <pre>{}</pre>", escape(text));
    }

    fn section_footer(&self, out: &mut String, _section: &Section) {
        let _ = writeln!(out, "    </div>");
    }

    fn postamble(&self, out: &mut String, _report: &Report) {
        let _ = writeln!(out, "    <p class='info-text'>Fine del report SnapAudit.</p>");
        let _ = writeln!(out, "    </div>");
        let _ = writeln!(out, "</body>");
        let _ = writeln!(out, "</html>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::render;

    fn permissions_section(warning: &str) -> Section {
        let record = ScanRecord::new()
            .with("Percorso File", "/etc/passwd")
            .with("Permessi (Ottale)", "0644")
            .with(WARNING_COLUMN, warning);
        Section::structured(PERMISSIONS_SECTION, vec![record]).unwrap()
    }

    #[test]
    fn warning_cells_get_conditional_styling() {
        assert_eq!(
            warning_cell("AVVISO: Scrivibile da 'other'!"),
            "<span class='warning'>AVVISO: Scrivibile da &#39;other&#39;!</span>"
        );
        assert_eq!(warning_cell("OK"), "<span class='ok'>OK</span>");
        // Error strings and blanks stay neutral.
        assert_eq!(warning_cell("File non trovato"), "File non trovato");
        assert_eq!(warning_cell(""), "");
    }

    #[test]
    fn permissions_table_styles_only_the_warning_column() {
        let mut report = Report::new();
        report.push(permissions_section("OK"));
        let rendered = render(&report, &HtmlFormat);

        assert!(rendered.contains("<td><span class='ok'>OK</span></td>"));
        assert!(rendered.contains("<td>/etc/passwd</td>"));
        assert!(rendered.contains("<td>0644</td>"));
    }

    #[test]
    fn known_sections_map_to_fixed_css_classes() {
        assert_eq!(css_class("Servizi Attivi"), Some("services"));
        assert_eq!(css_class("Porte Aperte"), Some("ports"));
        assert_eq!(css_class("Utenti Loggati"), Some("users"));
        assert_eq!(css_class("Modifiche Recenti (/etc)"), Some("files"));
        assert_eq!(css_class("Modifiche Recenti (/var)"), Some("files"));
        assert_eq!(css_class(PERMISSIONS_SECTION), Some("permissions"));
        assert_eq!(css_class("Sezione Sconosciuta"), None);
    }

    #[test]
    fn unknown_section_renders_without_extra_class() {
        let mut report = Report::new();
        report.push(Section::free_text("Sezione Sconosciuta", "testo"));
        let rendered = render(&report, &HtmlFormat);

        assert!(rendered.contains("<div class='section'>"));
        assert!(rendered.contains("<pre>testo</pre>"));
    }

    #[test]
    fn cell_values_are_escaped() {
        let record = ScanRecord::new().with("Percorso File", "/tmp/<x>&\"y\"");
        let mut report = Report::new();
        report.push(Section::structured("Sezione", vec![record]).unwrap());
        let rendered = render(&report, &HtmlFormat);

        assert!(rendered.contains("/tmp/&lt;x&gt;&amp;&quot;y&quot;"));
        assert!(!rendered.contains("<x>"));
    }

    #[test]
    fn empty_section_renders_no_data_paragraph() {
        let mut report = Report::new();
        report.push(Section::structured("Porte Aperte", Vec::new()).unwrap());
        let rendered = render(&report, &HtmlFormat);

        assert!(rendered.contains(&format!("<p>{}</p>", NO_DATA_LINE)));
        assert!(!rendered.contains("<table>"));
    }

    #[test]
    fn document_is_self_contained() {
        let rendered = render(&Report::new(), &HtmlFormat);
        assert!(rendered.starts_with("<!DOCTYPE html>"));
        assert!(rendered.contains("<style>"));
        assert!(!rendered.contains("http://"));
        assert!(!rendered.contains("https://"));
        assert!(rendered.trim_end().ends_with("</html>"));
    }
}
