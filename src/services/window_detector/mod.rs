//! WindowDetector service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for detecting the active window
//! and turning a change of it into a blur event. It MUST NOT contain any
//! sequence-matching logic; all buffer decisions are made by SequenceWatcher.

mod dry_run;
mod focus_tracker;
mod sway;
mod window_detector;
mod wmctrl;
mod xdotool;
mod r#trait;

pub use self::r#trait::create_window_detector;
