//! SequenceWatcher service: responsibility and boundaries
//!
//! This module owns the input buffer and the pending-clear deadline, matches
//! keydown events against the secret sequence and performs the one-shot
//! navigation on a match. It MUST NOT know where events come from: key and
//! blur events arrive through a single channel fed by the keyboard listener
//! and the window detector.

mod navigator;
mod runner;
mod watcher;

pub use self::navigator::create_navigator;
pub use self::watcher::{SequenceWatcher, WatcherSettings};
