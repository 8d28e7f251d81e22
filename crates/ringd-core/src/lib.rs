//! Alarm session manager for ringd
//!
//! This crate is the heart of ringd, containing:
//! - The session state machine (Idle -> Starting -> Playing -> Stopping -> Idle)
//! - Resource ownership rules (playback and notification handles)
//! - Idempotent start/stop handling and the shared cleanup path

mod manager;
mod session;

pub use manager::*;
pub use session::*;
