use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;

use crate::core::config::Config;
use crate::core::types::{ScanKind, ScanRecord, Section};
use crate::core::SnapResult;
use crate::utils::{log_message, LogLevel};

const OTHER_WRITABLE: u32 = 0o002;
const GROUP_WRITABLE: u32 = 0o020;

/// Permission bits rendered as a 4-digit zero-padded octal string
/// (mode 0o7 -> "0007"). Includes setuid/setgid/sticky bits.
pub fn octal_mode(mode: u32) -> String {
    format!("{:04o}", mode & 0o7777)
}

/// Security classification of a mode. Only regular files are flagged;
/// both warnings may apply, space-joined, 'other' before 'group'.
pub fn classify_mode(mode: u32, is_regular_file: bool) -> String {
    let mut warning = String::new();
    if is_regular_file && mode & OTHER_WRITABLE != 0 {
        warning.push_str("AVVISO: Scrivibile da 'other'!");
    }
    if is_regular_file && mode & GROUP_WRITABLE != 0 {
        if !warning.is_empty() {
            warning.push(' ');
        }
        warning.push_str("AVVISO: Scrivibile da 'group'!");
    }
    if warning.is_empty() {
        "OK".to_string()
    } else {
        warning
    }
}

/// Checks the permission bits of each path in the critical-file list.
///
/// This scan runs no external command: each path is stat-ed directly. An
/// inaccessible path reports a descriptive string in the permissions column
/// and a blank warning, never an error.
pub fn check_critical_permissions(paths: &[String]) -> Vec<ScanRecord> {
    let mut records = Vec::new();
    for path in paths {
        let (perms, warning) = match fs::metadata(path) {
            Ok(meta) => {
                let mode = meta.permissions().mode();
                (octal_mode(mode), classify_mode(mode, meta.is_file()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                ("File non trovato".to_string(), String::new())
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                ("Permesso negato (esegui come root?)".to_string(), String::new())
            }
            Err(e) => (format!("Errore: {}", e), String::new()),
        };
        records.push(
            ScanRecord::new()
                .with("Percorso File", path.as_str())
                .with("Permessi (Ottale)", perms)
                .with("Avviso di Sicurezza", warning),
        );
    }
    records
}

/// Runs the critical-file permissions scan.
pub fn collect(config: &Config) -> SnapResult<Section> {
    log_message(LogLevel::Info, "Controllo permessi file critici...");
    let records = check_critical_permissions(&config.critical_files);
    log_message(
        LogLevel::Pass,
        &format!("Controllo permessi completato per {} file.", records.len()),
    );
    Section::structured(ScanKind::Permissions.section_name(&config.watch_path), records)
}
