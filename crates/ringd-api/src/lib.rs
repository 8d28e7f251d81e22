//! Trigger-bridge boundary contract for ringd
//!
//! This crate defines the stable surface between the alarm core and whatever
//! UI layer triggers it:
//! - Commands (start/stop/status as typed variants, not string actions)
//! - Replies
//! - State snapshots

mod commands;
mod types;

pub use commands::*;
pub use types::*;
