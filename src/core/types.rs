use chrono::{DateTime, Local};

use crate::core::error::{SnapError, SnapResult};

/// Identifies which external probe produced a section's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Services,
    Ports,
    Users,
    Files,
    Permissions,
}

impl ScanKind {
    /// All scans in the fixed execution order.
    pub const ALL: [ScanKind; 5] = [
        ScanKind::Services,
        ScanKind::Ports,
        ScanKind::Users,
        ScanKind::Files,
        ScanKind::Permissions,
    ];

    /// Display name used as the section title in reports.
    pub fn section_name(&self, watch_path: &str) -> String {
        match self {
            ScanKind::Services => "Servizi Attivi".to_string(),
            ScanKind::Ports => "Porte Aperte".to_string(),
            ScanKind::Users => "Utenti Loggati".to_string(),
            ScanKind::Files => format!("Modifiche Recenti ({})", watch_path),
            ScanKind::Permissions => "Permessi File Critici".to_string(),
        }
    }

    /// The external command this scan corresponds to, for diagnostics.
    pub fn command_label(&self) -> &'static str {
        match self {
            ScanKind::Services => "systemctl list-units --type=service --state=running",
            ScanKind::Ports => "ss -tuln",
            ScanKind::Users => "who",
            ScanKind::Files => "find <path> -type f -mtime -<days>",
            ScanKind::Permissions => "(stat diretto, nessun comando esterno)",
        }
    }
}

/// One structured row of scan output: an ordered column -> value mapping.
///
/// Column order is insertion order and is identical across every record of
/// one section. A missing column reads as the empty string, never as an
/// absent cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRecord {
    fields: Vec<(String, String)>,
}

impl ScanRecord {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Builder-style insert for compact record construction.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|(c, _)| c.as_str()).collect()
    }
}

/// Payload of a section: structured rows or a raw text fallback.
#[derive(Debug, Clone)]
pub enum SectionPayload {
    Records(Vec<ScanRecord>),
    FreeText(String),
}

/// Named group of one scan's results within a report.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub payload: SectionPayload,
}

impl Section {
    /// Builds a structured section, validating that every record carries the
    /// same ordered column set as the first one. A mismatch is a programmer
    /// error in the parser and is rejected here rather than tolerated.
    pub fn structured(name: impl Into<String>, records: Vec<ScanRecord>) -> SnapResult<Self> {
        let name = name.into();
        if let Some(first) = records.first() {
            let schema = first.columns();
            for (idx, record) in records.iter().enumerate().skip(1) {
                if record.columns() != schema {
                    return Err(SnapError::SchemaMismatch(format!(
                        "section '{}': record {} has columns {:?}, expected {:?}",
                        name,
                        idx,
                        record.columns(),
                        schema
                    )));
                }
            }
        }
        Ok(Self {
            name,
            payload: SectionPayload::Records(records),
        })
    }

    pub fn free_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: SectionPayload::FreeText(text.into()),
        }
    }

    /// Number of structured records, 0 for free text.
    pub fn record_count(&self) -> usize {
        match &self.payload {
            SectionPayload::Records(records) => records.len(),
            SectionPayload::FreeText(_) => 0,
        }
    }
}

/// One audit pass: sections in the order the scans were requested, plus the
/// generation timestamp. Discarded after a single render + persist pass.
#[derive(Debug, Clone)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            generated_at: Local::now(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Timestamp in the sortable, filesystem-safe form used for file names
    /// and report banners.
    pub fn timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d_%H-%M-%S").to_string()
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_insertion_order() {
        let record = ScanRecord::new().with("UNIT", "sshd.service").with("LOAD", "loaded");
        assert_eq!(record.columns(), vec!["UNIT", "LOAD"]);
        assert_eq!(record.get("UNIT"), "sshd.service");
    }

    #[test]
    fn missing_column_reads_as_empty() {
        let record = ScanRecord::new().with("UNIT", "cron.service");
        assert_eq!(record.get("DESCRIPTION"), "");
    }

    #[test]
    fn structured_section_rejects_mixed_schemas() {
        let a = ScanRecord::new().with("UNIT", "a").with("LOAD", "loaded");
        let b = ScanRecord::new().with("LOAD", "loaded").with("UNIT", "b");
        let err = Section::structured("Servizi Attivi", vec![a, b]);
        assert!(matches!(err, Err(SnapError::SchemaMismatch(_))));
    }

    #[test]
    fn structured_section_accepts_uniform_schemas() {
        let a = ScanRecord::new().with("UNIT", "a").with("LOAD", "loaded");
        let b = ScanRecord::new().with("UNIT", "b").with("LOAD", "loaded");
        let section = Section::structured("Servizi Attivi", vec![a, b]).unwrap();
        assert_eq!(section.record_count(), 2);
    }

    #[test]
    fn empty_section_is_valid() {
        let section = Section::structured("Porte Aperte", Vec::new()).unwrap();
        assert_eq!(section.record_count(), 0);
    }
}
