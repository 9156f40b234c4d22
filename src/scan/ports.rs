use crate::core::config::Config;
use crate::core::types::{ScanKind, ScanRecord, Section};
use crate::core::SnapResult;
use crate::execution::capture_command;
use crate::utils::{log_message, LogLevel};

/// Parses `ss -tuln` output (listening tcp/udp sockets, numeric form).
///
/// ```text
/// Netid State  Recv-Q Send-Q Local Address:Port Peer Address:Port
/// tcp   LISTEN 0      128    0.0.0.0:22         0.0.0.0:*
/// ```
///
/// The first line is the header. The peer column may be absent; it defaults
/// to the empty string. Lines with fewer than 5 fields are skipped.
pub fn parse_ports(output: &str) -> Vec<ScanRecord> {
    let mut records = Vec::new();
    for line in output.trim().lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 {
            continue;
        }
        records.push(
            ScanRecord::new()
                .with("Netid", parts[0])
                .with("State", parts[1])
                .with("Recv-Q", parts[2])
                .with("Send-Q", parts[3])
                .with("Local Address:Port", parts[4])
                .with("Peer Address:Port", *parts.get(5).unwrap_or(&"")),
        );
    }
    records
}

/// Runs the open-ports scan against the live system.
pub fn collect(config: &Config) -> SnapResult<Section> {
    let outcome = capture_command("ss", &["-tuln"]);
    let records = parse_ports(outcome.stdout());
    log_message(
        LogLevel::Pass,
        &format!("Trovate {} porte in ascolto.", records.len()),
    );
    Section::structured(ScanKind::Ports.section_name(&config.watch_path), records)
}
