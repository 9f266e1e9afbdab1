//! Background deadline monitoring.
//!
//! # Responsibility
//! - Run the deadline sweep on a fixed interval in a dedicated thread.
//! - Provide explicit start/stop lifecycle for the owning process.
//!
//! # Invariants
//! - A sweep in progress always completes before the thread exits.
//! - A failed or panicking sweep never stops later sweeps.

pub mod deadline_monitor;
