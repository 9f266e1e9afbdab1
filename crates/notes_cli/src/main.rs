//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notes_core` linkage and wiring of store, service and monitor.
//! - Keep output deterministic for quick local sanity checks.

use log::error;
use notes_core::{CoreConfig, DeadlineMonitor, InMemoryNoteRepository, NoteService};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("notes_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("notes_core ping={}", notes_core::ping());
    println!("notes_core version={}", notes_core::core_version());

    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        notes_core::init_logging(config.log_level, log_dir)?;
    }

    let service = Arc::new(NoteService::new(InMemoryNoteRepository::new()));
    let monitor = DeadlineMonitor::start(Arc::clone(&service), config.deadline_check_interval)?;
    println!(
        "notes_core monitor_interval_secs={}",
        monitor.interval().as_secs()
    );

    let sample = service.create_note("sample", "smoke check", "2000-01-01 00:00")?;
    service.check_deadlines()?;
    let status = service
        .get_note_by_id(sample.id)?
        .map(|note| note.status.to_string())
        .unwrap_or_else(|| "missing".to_string());
    println!("notes_core sample_id={} sample_status={status}", sample.id);

    monitor.stop()?;
    Ok(())
}
