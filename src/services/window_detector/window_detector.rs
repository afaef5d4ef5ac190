use crate::config::Config;
use crate::error::{SeqError, Result};
use crate::events::{InputEvent, WindowInfo};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::focus_tracker::FocusTracker;
use super::r#trait::WindowDetectorTrait;
use super::sway::SwayDetector;
use super::wmctrl::WmctrlDetector;
use super::xdotool::XdotoolDetector;

#[derive(Debug, Clone, Copy)]
enum WorkingMethod {
    Xdotool,
    Wmctrl,
    Sway,
}

pub struct RealWindowDetector {
    config: Arc<Config>,
    events: mpsc::Sender<InputEvent>,
    tracker: FocusTracker,
    working_method: Option<WorkingMethod>,

    // Детекторы утилит
    xdotool: XdotoolDetector,
    wmctrl: WmctrlDetector,
    sway: SwayDetector,
}

impl RealWindowDetector {
    pub fn new(config: Arc<Config>, events: mpsc::Sender<InputEvent>) -> Self {
        info!("Инициализация RealWindowDetector");

        Self {
            config,
            events,
            tracker: FocusTracker::new(),
            working_method: None,
            xdotool: XdotoolDetector::new(),
            wmctrl: WmctrlDetector::new(),
            sway: SwayDetector::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let polling = Duration::from_millis(self.config.focus.polling_interval_ms);
        info!("RealWindowDetector запущен, интервал опроса {:?}", polling);

        let mut interval = interval(polling);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let method = match self.working_method {
                Some(method) => method,
                None => match self.detect_working_method().await {
                    Ok(method) => {
                        self.working_method = Some(method);
                        method
                    }
                    Err(e) => {
                        error!("{}. Приостанавливаем детекцию на 10 секунд", e);
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        continue;
                    }
                },
            };

            match self.get_window_by_method(method).await {
                Ok(window) => {
                    if self.tracker.observe(window) && self.events.send(InputEvent::Blur).await.is_err() {
                        debug!("Канал событий закрыт - RealWindowDetector завершает работу");
                        return Ok(());
                    }
                }
                Err(e) => {
                    warn!("Метод {:?} перестал работать: {}. Переопределяем...", method, e);
                    self.working_method = None;
                }
            }
        }
    }

    async fn detect_working_method(&self) -> Result<WorkingMethod> {
        info!("Определяем рабочий метод детекции окон...");

        if self.xdotool.test().await.is_ok() {
            info!("Используем xdotool");
            return Ok(WorkingMethod::Xdotool);
        }

        if self.wmctrl.test().await.is_ok() {
            info!("Используем wmctrl");
            return Ok(WorkingMethod::Wmctrl);
        }

        if self.sway.test().await.is_ok() {
            info!("Используем sway");
            return Ok(WorkingMethod::Sway);
        }

        Err(SeqError::ServiceUnavailable("Ни один метод детекции окон не работает".to_string()))
    }

    async fn get_window_by_method(&self, method: WorkingMethod) -> Result<WindowInfo> {
        match method {
            WorkingMethod::Xdotool => self.xdotool.get_active_window().await,
            WorkingMethod::Wmctrl => self.wmctrl.get_active_window().await,
            WorkingMethod::Sway => self.sway.get_active_window().await,
        }
    }
}

impl Drop for RealWindowDetector {
    fn drop(&mut self) {
        info!("RealWindowDetector завершает работу");
    }
}

#[async_trait::async_trait]
impl WindowDetectorTrait for RealWindowDetector {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
