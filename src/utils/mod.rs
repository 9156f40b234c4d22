pub mod logging;

pub use logging::{log_message, LogLevel};
