use crate::config::Config;
use crate::debug_if_enabled;
use crate::events::{InputEvent, KeyPress};
use rand::Rng;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::navigator::Navigator;

/// Неизменяемые параметры наблюдателя, фиксируются при запуске
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherSettings {
    target: Option<String>,
    destinations: Vec<String>,
    max_pause: Duration,
}

impl WatcherSettings {
    pub fn new(target: Option<&str>, destinations: Vec<String>, max_pause: Duration) -> Self {
        Self {
            target: target
                .map(str::to_lowercase)
                .filter(|target| !target.is_empty()),
            destinations: destinations
                .into_iter()
                .filter(|url| !url.is_empty())
                .collect(),
            max_pause,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.sequence.target.as_deref(),
            config.destinations(),
            Duration::from_millis(config.sequence.max_pause_ms),
        )
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn max_pause(&self) -> Duration {
        self.max_pause
    }
}

/// Результат обработки одного нажатия
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Аккорд с ctrl/alt/meta, состояние не тронуто
    Ignored,
    /// Не буква: буфер сброшен, таймер отменён
    Reset,
    /// Буква принята, в буфере префикс указанной длины
    Progress(usize),
    /// Буфер разошёлся с последовательностью и перезапущен (длина 0 или 1)
    Diverged(usize),
    /// Последовательность набрана; адрес, если был выбран
    Matched(Option<String>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatcherStats {
    pub matches: u64,
    pub navigations: u64,
    pub timeouts: u64,
    pub blurs: u64,
}

/// Детектор секретной последовательности клавиш.
///
/// Буфер всегда является префиксом целевой последовательности (или пуст),
/// отложенная очистка хранится как единственный дедлайн: новое расписание
/// заменяет предыдущее, любая другая очистка его снимает.
pub struct SequenceWatcher<N, R> {
    settings: WatcherSettings,
    navigator: N,
    rng: R,
    buffer: String,
    pending_clear: Option<Instant>,
    stats: WatcherStats,
}

impl<N: Navigator, R: Rng> SequenceWatcher<N, R> {
    pub fn new(settings: WatcherSettings, navigator: N, rng: R) -> Self {
        if settings.target.is_none() {
            warn!("Секретная последовательность не задана - переход никогда не сработает");
        }
        if settings.destinations.is_empty() {
            warn!("Адреса назначения не заданы - совпадение не приведёт к переходу");
        }
        info!(
            "Последовательность: {} символов, адресов: {}, допустимая пауза: {:?}",
            settings.target().map_or(0, str::len),
            settings.destinations().len(),
            settings.max_pause()
        );

        Self {
            settings,
            navigator,
            rng,
            buffer: String::new(),
            pending_clear: None,
            stats: WatcherStats::default(),
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) -> Option<KeyOutcome> {
        match event {
            InputEvent::Key(press) => Some(self.handle_key(press, now)),
            InputEvent::Blur => {
                self.handle_blur(now);
                None
            }
        }
    }

    /// Обработка keydown
    pub fn handle_key(&mut self, press: &KeyPress, now: Instant) -> KeyOutcome {
        // Просроченная очистка срабатывает раньше следующего нажатия
        self.expire(now);

        if press.modifiers.is_chord() {
            debug_if_enabled!("Аккорд {} проигнорирован", press);
            return KeyOutcome::Ignored;
        }

        let Some(letter) = press.letter() else {
            debug_if_enabled!("Клавиша {} не буква - сброс буфера", press);
            self.clear();
            return KeyOutcome::Reset;
        };

        self.schedule_clear(now);

        let Some(target) = self.settings.target.as_deref() else {
            // Без последовательности набранное не хранится
            return KeyOutcome::Progress(0);
        };

        self.buffer.push(letter);
        let mut outcome = KeyOutcome::Progress(self.buffer.len());

        if !target.starts_with(self.buffer.as_str()) {
            self.buffer.clear();
            if target.starts_with(letter) {
                self.buffer.push(letter);
            }
            outcome = KeyOutcome::Diverged(self.buffer.len());
        }

        if target == self.buffer {
            return self.complete();
        }

        debug_if_enabled!(
            "Буфер: {} из {} символов",
            self.buffer.len(),
            target.len()
        );
        outcome
    }

    /// Потеря фокуса сбрасывает любой прогресс
    pub fn handle_blur(&mut self, now: Instant) {
        self.expire(now);
        if !self.buffer.is_empty() || self.pending_clear.is_some() {
            debug!("Потеря фокуса - сброс набранного префикса");
        }
        self.stats.blurs += 1;
        self.clear();
    }

    /// Выполнить отложенную очистку, если её срок наступил
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.pending_clear {
            Some(deadline) if now >= deadline => {
                debug_if_enabled!("Пауза превысила {:?} - буфер очищен", self.settings.max_pause);
                self.buffer.clear();
                self.pending_clear = None;
                self.stats.timeouts += 1;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_clear
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pending_clear = None;
    }

    #[allow(dead_code)]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[allow(dead_code)]
    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    #[allow(dead_code)]
    pub fn settings(&self) -> &WatcherSettings {
        &self.settings
    }

    pub fn stats(&self) -> WatcherStats {
        self.stats
    }

    #[allow(dead_code)]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    fn schedule_clear(&mut self, now: Instant) {
        self.pending_clear = Some(now + self.settings.max_pause);
    }

    fn complete(&mut self) -> KeyOutcome {
        self.stats.matches += 1;
        info!("Секретная последовательность набрана");

        let chosen = self.choose_destination();
        match &chosen {
            Some(url) => match self.navigator.navigate(url) {
                Ok(()) => {
                    self.stats.navigations += 1;
                    info!("Открыт адрес: {}", url);
                }
                Err(e) => warn!("Не удалось открыть {}: {}", url, e),
            },
            None => debug!("Нет адресов назначения - переход пропущен"),
        }

        self.clear();
        KeyOutcome::Matched(chosen)
    }

    fn choose_destination(&mut self) -> Option<String> {
        let destinations = &self.settings.destinations;
        if destinations.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..destinations.len());
        Some(destinations[index].clone())
    }
}
