use crate::core::config::Config;
use crate::core::types::{ScanKind, ScanRecord, Section};
use crate::core::SnapResult;
use crate::execution::capture_command;
use crate::scan::split_fields;
use crate::utils::{log_message, LogLevel};

/// Parses `who` output, one logged-in session per line:
///
/// ```text
/// alice pts/0 2024-01-01 10:00 (192.168.1.100)
/// ```
///
/// Date and time arrive as two fields and are re-joined into one value. The
/// host field, when present, is stripped of its wrapping parentheses; a
/// session without one (console login) reports the literal "Locale".
pub fn parse_users(output: &str) -> Vec<ScanRecord> {
    let mut records = Vec::new();
    for line in output.trim().lines() {
        let parts = split_fields(line, 5);
        if parts.len() < 4 {
            continue;
        }
        let datetime = format!("{} {}", parts[2], parts[3]);
        let host = parts
            .get(4)
            .map(|h| h.trim_matches(|c| c == '(' || c == ')').to_string())
            .unwrap_or_else(|| "Locale".to_string());
        records.push(
            ScanRecord::new()
                .with("Utente", parts[0])
                .with("Terminale (TTY)", parts[1])
                .with("Data e Ora Login", datetime)
                .with("Host Remoto", host),
        );
    }
    records
}

/// Runs the logged-in-users scan against the live system.
pub fn collect(config: &Config) -> SnapResult<Section> {
    let outcome = capture_command("who", &[]);
    let records = parse_users(outcome.stdout());
    log_message(
        LogLevel::Pass,
        &format!("Trovati {} utenti loggati.", records.len()),
    );
    Section::structured(ScanKind::Users.section_name(&config.watch_path), records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_without_host_reports_locale() {
        let records = parse_users("alice tty1 2024-01-01 10:00");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Utente"), "alice");
        assert_eq!(records[0].get("Terminale (TTY)"), "tty1");
        assert_eq!(records[0].get("Data e Ora Login"), "2024-01-01 10:00");
        assert_eq!(records[0].get("Host Remoto"), "Locale");
    }

    #[test]
    fn remote_host_loses_wrapping_parentheses() {
        let records = parse_users("bob pts/0 2024-01-01 10:01 (192.168.1.100)");
        assert_eq!(records[0].get("Host Remoto"), "192.168.1.100");
    }

    #[test]
    fn display_session_host_is_kept_verbatim_inside_parens() {
        let records = parse_users("carol :0 2023-10-27 08:00 (:0)");
        assert_eq!(records[0].get("Host Remoto"), ":0");
    }

    #[test]
    fn short_lines_are_skipped_and_order_preserved() {
        let output = "alice tty1 2024-01-01 10:00\nbroken line\nbob pts/0 2024-01-01 10:01 (remote)";
        let records = parse_users(output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Utente"), "alice");
        assert_eq!(records[1].get("Utente"), "bob");
    }

    #[test]
    fn empty_output_yields_no_records() {
        assert!(parse_users("").is_empty());
        assert!(parse_users("\n\n").is_empty());
    }
}
