pub mod runner;

pub use runner::{capture_command, open_report_file, CommandOutcome};
