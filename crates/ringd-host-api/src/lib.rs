//! Host adapter trait interfaces for ringd
//!
//! This crate defines the capability-based interface between the alarm core
//! and platform-specific implementations. It contains no platform code
//! itself: playback is `{open, start_looping, stop, release}` and the
//! notification surface is `{ensure_channel, show, cancel}`.

mod handle;
mod mock;
mod traits;

pub use handle::*;
pub use mock::*;
pub use traits::*;
