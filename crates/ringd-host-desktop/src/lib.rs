//! Desktop host adapter for ringd
//!
//! Implements the playback capability set over rodio, with the output stream
//! owned by a dedicated audio thread, and the notification capability set as
//! a structured-log surface. The real mobile notification/audio APIs are
//! platform collaborators outside this repository; these adapters are the
//! process-local equivalents.

mod notify;
mod playback;

pub use notify::*;
pub use playback::*;
