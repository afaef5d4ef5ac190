use crate::error::Result;
use crate::events::{InputEvent, WindowInfo};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::focus_tracker::FocusTracker;
use super::r#trait::WindowDetectorTrait;

const FAKE_WINDOWS: [&str; 3] = ["Terminal - dry_run", "Browser - dry_run", "Editor - dry_run"];

pub struct DryRunDetector {
    events: mpsc::Sender<InputEvent>,
    tracker: FocusTracker,
    switch_every: Duration,
}

impl DryRunDetector {
    pub fn new(events: mpsc::Sender<InputEvent>) -> Self {
        Self {
            events,
            tracker: FocusTracker::new(),
            switch_every: Duration::from_secs(30),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!("Dry-run режим - WindowDetector эмулирует смену окна каждые {:?}", self.switch_every);

        let mut window_index = 0;
        let mut interval = interval(self.switch_every);

        loop {
            interval.tick().await;

            let fake_window = WindowInfo::new(FAKE_WINDOWS[window_index]).with_class("DryRun");

            if self.tracker.observe(fake_window) && self.events.send(InputEvent::Blur).await.is_err() {
                debug!("Канал событий закрыт - DryRunDetector завершает работу");
                return Ok(());
            }

            window_index = (window_index + 1) % FAKE_WINDOWS.len();
        }
    }
}

#[async_trait::async_trait]
impl WindowDetectorTrait for DryRunDetector {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
