pub mod keyboard_listener;
pub mod sequence_watcher;
pub mod window_detector;

pub use keyboard_listener::create_keyboard_listener;
pub use sequence_watcher::{create_navigator, SequenceWatcher, WatcherSettings};
pub use window_detector::create_window_detector;
