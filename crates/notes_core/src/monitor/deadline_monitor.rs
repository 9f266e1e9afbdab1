//! Recurring deadline sweep with cancellable lifecycle.

use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const MONITOR_THREAD_NAME: &str = "deadline-monitor";

/// Handle the monitor uses to run one sweep.
pub trait DeadlineSweeper: Send + Sync + 'static {
    type Error: Display;

    /// Runs one sweep and returns how many notes changed status.
    fn sweep_deadlines(&self) -> Result<usize, Self::Error>;
}

impl<R> DeadlineSweeper for NoteService<R>
where
    R: NoteRepository + Send + Sync + 'static,
{
    type Error = NoteServiceError;

    fn sweep_deadlines(&self) -> Result<usize, Self::Error> {
        self.check_deadlines()
    }
}

/// Errors from monitor lifecycle operations.
#[derive(Debug)]
pub enum DeadlineMonitorError {
    /// Interval must be non-zero.
    ZeroInterval,
    /// OS refused to spawn the worker thread.
    Spawn(std::io::Error),
    /// Worker thread panicked outside a sweep.
    WorkerPanicked,
}

impl Display for DeadlineMonitorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroInterval => write!(f, "deadline check interval must be greater than zero"),
            Self::Spawn(err) => write!(f, "failed to spawn deadline monitor thread: {err}"),
            Self::WorkerPanicked => write!(f, "deadline monitor thread panicked"),
        }
    }
}

impl Error for DeadlineMonitorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

/// Running deadline monitor.
///
/// The first sweep runs right after start, then one per `interval`.
/// Dropping the handle stops the worker and waits for it.
pub struct DeadlineMonitor {
    interval: Duration,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl DeadlineMonitor {
    /// Spawns the worker thread.
    ///
    /// # Errors
    /// - `ZeroInterval` when `interval` is zero.
    /// - `Spawn` when the thread cannot be created.
    pub fn start<S: DeadlineSweeper>(
        sweeper: Arc<S>,
        interval: Duration,
    ) -> Result<Self, DeadlineMonitorError> {
        if interval.is_zero() {
            return Err(DeadlineMonitorError::ZeroInterval);
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(MONITOR_THREAD_NAME.to_string())
            .spawn(move || run_loop(sweeper.as_ref(), interval, &stop_rx))
            .map_err(DeadlineMonitorError::Spawn)?;

        info!(
            "event=deadline_monitor_start module=monitor status=ok interval_ms={}",
            interval.as_millis()
        );
        Ok(Self {
            interval,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        })
    }

    /// Time between the end of one sweep and the start of the next.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns whether the worker thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Requests shutdown and waits for the current sweep to finish.
    pub fn stop(mut self) -> Result<(), DeadlineMonitorError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), DeadlineMonitorError> {
        // Dropping the sender also wakes the worker.
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        match worker.join() {
            Ok(()) => {
                info!("event=deadline_monitor_stop module=monitor status=ok");
                Ok(())
            }
            Err(_) => {
                error!("event=deadline_monitor_stop module=monitor status=error error_code=worker_panicked");
                Err(DeadlineMonitorError::WorkerPanicked)
            }
        }
    }
}

impl Drop for DeadlineMonitor {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn run_loop<S: DeadlineSweeper>(sweeper: &S, interval: Duration, stop_rx: &Receiver<()>) {
    loop {
        run_sweep(sweeper);
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn run_sweep<S: DeadlineSweeper>(sweeper: &S) {
    let started_at = Instant::now();
    match catch_unwind(AssertUnwindSafe(|| sweeper.sweep_deadlines())) {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => warn!(
            "event=deadline_sweep module=monitor status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
        Err(_) => error!(
            "event=deadline_sweep module=monitor status=error duration_ms={} error_code=sweep_panicked",
            started_at.elapsed().as_millis()
        ),
    }
}
