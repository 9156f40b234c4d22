use crate::core::config::Config;
use crate::core::types::{ScanKind, ScanRecord, Section};
use crate::core::SnapResult;
use crate::execution::capture_command;
use crate::scan::split_fields;
use crate::utils::{log_message, LogLevel};

/// Parses `systemctl list-units --type=service --state=running` output.
///
/// The first line is the column header and the last line is the unit-count
/// summary; everything in between is one service per line:
///
/// ```text
/// UNIT             LOAD   ACTIVE SUB     DESCRIPTION
/// cron.service     loaded active running Regular background program ...
/// ```
///
/// Lines that do not yield at least UNIT/LOAD/ACTIVE/SUB are skipped.
pub fn parse_services(output: &str) -> Vec<ScanRecord> {
    let lines: Vec<&str> = output.trim().lines().collect();
    if lines.len() <= 2 {
        return Vec::new();
    }

    let mut records = Vec::new();
    for line in &lines[1..lines.len() - 1] {
        let parts = split_fields(line, 5);
        if parts.len() < 4 {
            continue;
        }
        records.push(
            ScanRecord::new()
                .with("UNIT", parts[0])
                .with("LOAD", parts[1])
                .with("ACTIVE", parts[2])
                .with("SUB", parts[3])
                .with("DESCRIPTION", *parts.get(4).unwrap_or(&"")),
        );
    }
    records
}

/// Runs the services scan against the live system.
pub fn collect(config: &Config) -> SnapResult<Section> {
    let outcome = capture_command(
        "systemctl",
        &["list-units", "--type=service", "--state=running"],
    );
    let records = parse_services(outcome.stdout());
    log_message(
        LogLevel::Pass,
        &format!("Trovati {} servizi attivi.", records.len()),
    );
    Section::structured(ScanKind::Services.section_name(&config.watch_path), records)
}
