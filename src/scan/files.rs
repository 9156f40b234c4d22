use std::fs;
use std::io;

use chrono::{DateTime, Local};

use crate::core::config::Config;
use crate::core::types::{ScanKind, ScanRecord, Section};
use crate::core::SnapResult;
use crate::execution::capture_command;
use crate::utils::{log_message, LogLevel};

/// Parses `find <path> -type f -mtime -<days>` output: one path per line,
/// already filtered by modification time by the command itself.
///
/// The modification timestamp is read at parse time. A path that vanished
/// between the find and the stat degrades to a placeholder cell instead of
/// dropping the record.
pub fn parse_file_changes(output: &str) -> Vec<ScanRecord> {
    let mut records = Vec::new();
    for line in output.lines() {
        let path = line.trim();
        if path.is_empty() {
            continue;
        }
        let modified = match file_mtime(path) {
            Ok(mtime) => mtime,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log_message(
                    LogLevel::Warning,
                    &format!("File non trovato durante la lettura della data di modifica: {}", path),
                );
                "Errore: File non trovato".to_string()
            }
            Err(e) => {
                log_message(
                    LogLevel::Warning,
                    &format!("Errore nel leggere la data di modifica per {}: {}", path, e),
                );
                format!("Errore: {}", e)
            }
        };
        records.push(
            ScanRecord::new()
                .with("Percorso File", path)
                .with("Ultima Modifica", modified),
        );
    }
    records
}

fn file_mtime(path: &str) -> io::Result<String> {
    let modified = fs::metadata(path)?.modified()?;
    let local: DateTime<Local> = modified.into();
    Ok(local.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Runs the recent-file-changes scan against the live system.
pub fn collect(config: &Config) -> SnapResult<Section> {
    let days = format!("-{}", config.watch_days);
    let outcome = capture_command(
        "find",
        &[config.watch_path.as_str(), "-type", "f", "-mtime", days.as_str()],
    );
    let records = parse_file_changes(outcome.stdout());
    log_message(
        LogLevel::Pass,
        &format!(
            "Trovati {} file modificati negli ultimi {} giorni in {}.",
            records.len(),
            config.watch_days,
            config.watch_path
        ),
    );
    Section::structured(ScanKind::Files.section_name(&config.watch_path), records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn existing_file_gets_formatted_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("changed.conf");
        writeln!(fs::File::create(&path).unwrap(), "x").unwrap();

        let records = parse_file_changes(&format!("{}\n", path.display()));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Percorso File"), path.display().to_string());
        let mtime = records[0].get("Ultima Modifica");
        // %Y-%m-%d %H:%M:%S
        assert_eq!(mtime.len(), 19);
        assert!(!mtime.starts_with("Errore"));
    }

    #[test]
    fn vanished_file_degrades_to_placeholder_cell() {
        let records = parse_file_changes("/no/such/path/at/all.conf\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Ultima Modifica"), "Errore: File non trovato");
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(parse_file_changes("\n   \n").is_empty());
    }

    #[test]
    fn input_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::File::create(&a).unwrap();
        fs::File::create(&b).unwrap();

        let input = format!("{}\n{}\n", b.display(), a.display());
        let records = parse_file_changes(&input);
        assert_eq!(records[0].get("Percorso File"), b.display().to_string());
        assert_eq!(records[1].get("Percorso File"), a.display().to_string());
    }
}
