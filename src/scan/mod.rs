pub mod files;
pub mod permissions;
pub mod ports;
pub mod services;
pub mod users;

use crate::core::config::Config;
use crate::core::types::{ScanKind, Section};
use crate::core::SnapResult;

/// Runs one scan end to end: external command (where the scan has one),
/// parse, section assembly. Tool problems degrade to an empty section.
pub fn run_scan(kind: ScanKind, config: &Config) -> SnapResult<Section> {
    match kind {
        ScanKind::Services => services::collect(config),
        ScanKind::Ports => ports::collect(config),
        ScanKind::Users => users::collect(config),
        ScanKind::Files => files::collect(config),
        ScanKind::Permissions => permissions::collect(config),
    }
}

/// Splits a line on runs of whitespace into at most `max` fields; the last
/// field keeps its embedded spaces. Mirrors the behavior systemctl/who
/// output parsing needs (a trailing description column may contain spaces).
pub(crate) fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut rest = line.trim();
    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                fields.push(&rest[..idx]);
                rest = rest[idx..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}
