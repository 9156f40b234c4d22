use std::env;
use std::fs;
use std::path::Path;

/// Default set of sensitive configuration files checked for permission
/// exposure. /etc/shadow and /etc/sudoers usually require root to stat.
pub const DEFAULT_CRITICAL_FILES: &[&str] = &[
    "/etc/passwd",
    "/etc/shadow",
    "/etc/group",
    "/etc/sudoers",
    "/etc/crontab",
    "/etc/anacrontab",
    "/etc/ssh/sshd_config",
    "/etc/hosts",
    "/etc/resolv.conf",
];

/// SnapAudit configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_file: String,
    pub output_dir: String,
    pub watch_path: String,
    pub watch_days: u32,
    pub critical_files: Vec<String>,
    pub verbose: bool,
    pub open_report: bool,
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = env::var("SNAPAUDIT_CONFIG")
            .unwrap_or_else(|_| "/etc/snapaudit/snapaudit.conf".to_string());

        let mut config = Self::default();
        config.config_file = config_file.clone();

        // Load from config file if it exists
        if Path::new(&config_file).exists() {
            config.load_from_file(&config_file)?;
        }

        // Override with environment variables
        config.load_from_env();

        Ok(config)
    }

    fn load_from_file(&mut self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        match fs::read_to_string(path) {
            Ok(content) => {
                for line in content.lines() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }

                    if let Some((key, value)) = line.split_once('=') {
                        let key = key.trim();
                        let value = value.trim().trim_matches('"');

                        match key {
                            "OUTPUT_DIR" => self.output_dir = value.to_string(),
                            "WATCH_PATH" => self.watch_path = value.to_string(),
                            "WATCH_DAYS" => self.watch_days = value.parse()?,
                            "CRITICAL_FILES" => {
                                self.critical_files = value
                                    .split(':')
                                    .filter(|p| !p.is_empty())
                                    .map(|p| p.to_string())
                                    .collect();
                            }
                            "VERBOSE" => self.verbose = value.parse().unwrap_or(false),
                            "OPEN_REPORT" => self.open_report = value.parse().unwrap_or(true),
                            _ => {} // Ignore unknown keys
                        }
                    }
                }
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                // Config file exists but we can't read it - use defaults
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn load_from_env(&mut self) {
        if let Ok(val) = env::var("SNAPAUDIT_OUTPUT_DIR") {
            self.output_dir = val;
        }
        if let Ok(val) = env::var("SNAPAUDIT_WATCH_PATH") {
            self.watch_path = val;
        }
        if let Ok(val) = env::var("SNAPAUDIT_WATCH_DAYS") {
            if let Ok(days) = val.parse() {
                self.watch_days = days;
            }
        }
        if let Ok(val) = env::var("SNAPAUDIT_VERBOSE") {
            if let Ok(verbose) = val.parse() {
                self.verbose = verbose;
            }
        }
        if let Ok(val) = env::var("SNAPAUDIT_OPEN_REPORT") {
            if let Ok(open_report) = val.parse() {
                self.open_report = open_report;
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: "/etc/snapaudit/snapaudit.conf".to_string(),
            output_dir: "reports".to_string(),
            watch_path: "/etc".to_string(),
            watch_days: 1,
            critical_files: DEFAULT_CRITICAL_FILES.iter().map(|s| s.to_string()).collect(),
            verbose: false,
            open_report: true,
        }
    }
}
