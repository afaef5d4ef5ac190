use crate::events::WindowInfo;
use tracing::info;

/// Запоминает последнее активное окно и сообщает о смене фокуса
#[derive(Debug, Default)]
pub struct FocusTracker {
    current: Option<WindowInfo>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true`, если окно сменилось. Первое наблюдение только запоминается.
    pub fn observe(&mut self, window: WindowInfo) -> bool {
        let changed = match &self.current {
            Some(current) if current.differs_from(&window) => {
                info!("Смена активного окна: {} -> {}", current, window);
                true
            }
            Some(_) => false,
            None => {
                info!("Активное окно: {}", window);
                false
            }
        };

        self.current = Some(window);
        changed
    }
}
