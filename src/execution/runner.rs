use std::io;
use std::path::Path;
use std::process::Command;

use crate::utils::{log_message, LogLevel};

/// Outcome of one external command invocation.
///
/// Scans never hard-fail on tool problems: `Unavailable` and `Failed` both
/// degrade to an empty record set at the parser boundary.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Command ran and exited zero; captured stdout.
    Output(String),
    /// Command ran, exited non-zero with empty stderr. By explicit policy
    /// this is an empty result set, not a failure (find(1) behaves this way
    /// when nothing matches).
    Empty,
    /// Command exited non-zero with diagnostic text on stderr.
    Failed,
    /// Command not found on this system.
    Unavailable,
}

impl CommandOutcome {
    /// Stdout to hand to a parser; anything but `Output` parses as no lines.
    pub fn stdout(&self) -> &str {
        match self {
            CommandOutcome::Output(text) => text,
            _ => "",
        }
    }
}

/// Runs an external command and captures stdout under the scan error policy.
pub fn capture_command(program: &str, args: &[&str]) -> CommandOutcome {
    log_message(
        LogLevel::Info,
        &format!("Esecuzione comando: {} {}", program, args.join(" ")),
    );

    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log_message(
                LogLevel::Error,
                &format!("Il comando '{}' non è stato trovato.", program),
            );
            return CommandOutcome::Unavailable;
        }
        Err(e) => {
            log_message(
                LogLevel::Error,
                &format!("Errore durante l'esecuzione di '{}': {}", program, e),
            );
            return CommandOutcome::Failed;
        }
    };

    if output.status.success() {
        return CommandOutcome::Output(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        // Non-zero exit, silent stderr: treat as "no results".
        CommandOutcome::Empty
    } else {
        log_message(
            LogLevel::Error,
            &format!("'{}' è terminato con {}: {}", program, output.status, stderr),
        );
        CommandOutcome::Failed
    }
}

/// Best effort: open the generated report with the OS default application.
/// Every failure degrades to a hint on how to open the file manually.
pub fn open_report_file(path: &Path) {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };

    match Command::new(opener).arg(path).status() {
        Ok(status) if status.success() => {
            log_message(LogLevel::Pass, &format!("Report aperto: {}", path.display()));
        }
        Ok(status) => {
            log_message(
                LogLevel::Warning,
                &format!("'{}' è terminato con {}", opener, status),
            );
            log_message(
                LogLevel::Warning,
                &format!("Apri manualmente il report: {}", path.display()),
            );
        }
        Err(_) => {
            log_message(
                LogLevel::Warning,
                &format!("Comando '{}' non disponibile su questo sistema.", opener),
            );
            log_message(
                LogLevel::Warning,
                &format!("Apri manualmente il report: {}", path.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_is_unavailable() {
        let outcome = capture_command("snapaudit-no-such-binary", &[]);
        assert!(matches!(outcome, CommandOutcome::Unavailable));
        assert_eq!(outcome.stdout(), "");
    }

    #[test]
    fn successful_command_captures_stdout() {
        let outcome = capture_command("echo", &["hello"]);
        match outcome {
            CommandOutcome::Output(text) => assert_eq!(text.trim(), "hello"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn nonzero_exit_with_silent_stderr_is_empty() {
        let outcome = capture_command("false", &[]);
        assert!(matches!(outcome, CommandOutcome::Empty));
    }
}
