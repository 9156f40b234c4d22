mod core;
mod execution;
mod report;
mod scan;
mod utils;

use std::path::Path;
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use comfy_table::{presets::UTF8_FULL, Table};

use crate::core::config::Config;
use crate::core::types::{Report, ScanKind, Section};
use crate::execution::open_report_file;
use crate::report::{find_latest_report, render, write_report, HtmlFormat, TextFormat};
use crate::scan::run_scan;
use crate::utils::{log_message, LogLevel};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_banner() {
    println!();
    println!("  ____                      _             _ _ _");
    println!(" / ___| _ __   __ _ _ __   / \\  _   _  __| (_) |_");
    println!(" \\___ \\| '_ \\ / _` | '_ \\ / _ \\| | | |/ _` | | __|");
    println!("  ___) | | | | (_| | |_) / ___ \\ |_| | (_| | | |_");
    println!(" |____/|_| |_|\\__,_| .__/_/   \\_\\__,_|\\__,_|_|\\__|");
    println!("                   |_|                 v{}", VERSION);
    println!();
}

fn build_cli() -> Command {
    Command::new("snapaudit")
        .version(VERSION)
        .about("Fotografia di sicurezza del sistema locale: servizi, porte, utenti, file e permessi")
        .arg(
            Arg::new("services")
                .long("services")
                .help("Scansiona i servizi systemd in esecuzione")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ports")
                .long("ports")
                .help("Scansiona le porte in ascolto (ss -tuln)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("users")
                .long("users")
                .help("Scansiona le sessioni utente loggate (who)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("files")
                .long("files")
                .help("Scansiona i file modificati di recente")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("permissions")
                .long("permissions")
                .help("Controlla i permessi dei file critici")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .short('a')
                .help("Esegue tutte le scansioni (default se nessuna è selezionata)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help("Genera anche il report HTML oltre a quello testuale")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .value_name("DIR")
                .help("Directory dove salvare i report"),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .value_name("PATH")
                .help("Percorso osservato dalla scansione file [default: /etc]"),
        )
        .arg(
            Arg::new("days")
                .long("days")
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .help("Giorni indietro per la scansione file [default: 1]"),
        )
        .arg(
            Arg::new("latest")
                .long("latest")
                .help("Stampa il percorso dell'ultimo report generato ed esce")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-open")
                .long("no-open")
                .help("Non aprire il report con l'applicazione predefinita")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Output diagnostico aggiuntivo")
                .action(ArgAction::SetTrue),
        )
}

/// Scans selected on the command line, in the fixed execution order.
fn selected_scans(matches: &ArgMatches) -> Vec<ScanKind> {
    let explicit: Vec<ScanKind> = ScanKind::ALL
        .into_iter()
        .filter(|kind| {
            let flag = match kind {
                ScanKind::Services => "services",
                ScanKind::Ports => "ports",
                ScanKind::Users => "users",
                ScanKind::Files => "files",
                ScanKind::Permissions => "permissions",
            };
            matches.get_flag(flag)
        })
        .collect();

    if matches.get_flag("all") || explicit.is_empty() {
        ScanKind::ALL.to_vec()
    } else {
        explicit
    }
}

fn print_summary(sections: &[(ScanKind, Section)]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Sezione", "Record", "Sorgente"]);
    for (kind, section) in sections {
        table.add_row(vec![
            section.name.clone(),
            section.record_count().to_string(),
            kind.command_label().to_string(),
        ]);
    }
    println!("{table}");
}

fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_cli().get_matches();

    let mut config = Config::load()?;
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output_dir = dir.clone();
    }
    if let Some(path) = matches.get_one::<String>("path") {
        config.watch_path = path.clone();
    }
    if let Some(days) = matches.get_one::<u32>("days") {
        config.watch_days = *days;
    }
    if matches.get_flag("verbose") {
        config.verbose = true;
    }
    if matches.get_flag("no-open") {
        config.open_report = false;
    }

    if matches.get_flag("latest") {
        match find_latest_report(Path::new(&config.output_dir), "txt") {
            Some(path) => println!("{}", path.display()),
            None => log_message(
                LogLevel::Warning,
                &format!("Nessun report trovato in '{}'.", config.output_dir),
            ),
        }
        return Ok(());
    }

    print_banner();

    let scans = selected_scans(&matches);
    if config.verbose {
        log_message(
            LogLevel::Info,
            &format!("Configurazione: {:?}", config),
        );
    }
    if scans.contains(&ScanKind::Permissions) && !is_root() {
        log_message(
            LogLevel::Warning,
            "Esecuzione senza privilegi di root: alcuni file critici (es. /etc/shadow) potrebbero non essere leggibili.",
        );
    }

    let mut collected: Vec<(ScanKind, Section)> = Vec::new();
    for kind in scans {
        // SchemaMismatch here is a parser bug, not a degraded scan: propagate.
        let section = run_scan(kind, &config)?;
        collected.push((kind, section));
    }

    print_summary(&collected);

    let mut audit = Report::new();
    for (_, section) in collected {
        audit.push(section);
    }
    if audit.is_empty() {
        log_message(LogLevel::Warning, "Nessuna scansione eseguita.");
        return Ok(());
    }

    // Terminal display shares the persisted text rendering.
    print!("{}", render(&audit, &TextFormat));

    let output_dir = Path::new(&config.output_dir);
    match write_report(&audit, &TextFormat, output_dir) {
        Ok(path) => {
            log_message(
                LogLevel::Pass,
                &format!("Report '{}' generato con successo.", path.display()),
            );
            if config.open_report {
                open_report_file(&path);
            }
        }
        Err(e) => {
            // Persistence is the one failure the user must hear about.
            log_message(
                LogLevel::Error,
                &format!("Errore critico durante la generazione del report: {}", e),
            );
            return Err(e.into());
        }
    }

    if matches.get_flag("html") {
        match write_report(&audit, &HtmlFormat, output_dir) {
            Ok(path) => log_message(
                LogLevel::Pass,
                &format!("Report '{}' generato con successo.", path.display()),
            ),
            Err(e) => {
                log_message(
                    LogLevel::Error,
                    &format!("Errore critico durante la generazione del report HTML: {}", e),
                );
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log_message(LogLevel::Error, &format!("{}", e));
        process::exit(1);
    }
}
