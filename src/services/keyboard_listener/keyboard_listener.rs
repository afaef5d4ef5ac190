use crate::config::Config;
use crate::error::{SeqError, Result};
use crate::events::{InputEvent, KeyPress};
use crate::mappings::EvdevToKeyName;
use crate::trace_if_enabled;
use crate::utils::DeviceFinder;
use evdev::{Device, EventStream, EventType, KeyCode};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::modifier_state::ModifierState;
use super::r#trait::KeyboardListenerTrait;

/// Сколько ошибок чтения подряд допускается, прежде чем считать устройство потерянным
const MAX_READ_ERRORS: u32 = 50;

pub struct RealKeyboardListener {
    device_path: PathBuf,
    stream: EventStream,
    events: mpsc::Sender<InputEvent>,
    modifier_state: ModifierState,
}

impl RealKeyboardListener {
    pub fn new(config: Arc<Config>, events: mpsc::Sender<InputEvent>) -> Result<Self> {
        info!("Инициализация RealKeyboardListener");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            SeqError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        // Устройство не захватывается: набранный текст должен доходить до приложений
        Self::log_device(&device);

        let stream = device.into_event_stream()?;

        Ok(Self {
            device_path,
            stream,
            events,
            modifier_state: ModifierState::new(),
        })
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("RealKeyboardListener запущен, читаем события {:?}", self.device_path);

        let mut read_errors = 0;

        loop {
            let event = match self.stream.next_event().await {
                Ok(event) => {
                    read_errors = 0;
                    event
                }
                Err(e) => {
                    read_errors += 1;
                    error!("Ошибка чтения событий: {}", e);
                    if read_errors >= MAX_READ_ERRORS {
                        return Err(SeqError::ServiceUnavailable(format!(
                            "Устройство {:?} перестало отвечать: {}",
                            self.device_path, e
                        )));
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            let Some(press) = translate_event(event, &mut self.modifier_state) else {
                continue;
            };

            trace_if_enabled!("Нажатие: {}", press);

            if self.events.send(InputEvent::Key(press)).await.is_err() {
                debug!("Канал событий закрыт - RealKeyboardListener завершает работу");
                return Ok(());
            }
        }
    }

    fn log_device(device: &Device) {
        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
        if device.unique_name().is_none() {
            warn!("У устройства нет уникального ID");
        }
    }
}

/// Превращает evdev событие в keydown.
///
/// Состояние модификаторов обновляется до построения события, поэтому нажатие
/// самого Ctrl уже приходит как аккорд, а нажатие Shift - как обычная клавиша.
/// Отпускания и не-клавиатурные события только обновляют состояние.
pub(crate) fn translate_event(
    event: evdev::InputEvent,
    modifier_state: &mut ModifierState,
) -> Option<KeyPress> {
    if event.event_type() != EventType::KEY {
        return None;
    }

    let key = KeyCode::new(event.code());
    let pressed = match event.value() {
        0 => false,
        // 1 - нажатие, 2 - автоповтор: оба считаются keydown
        1 | 2 => true,
        other => {
            debug!("Неизвестное значение события: {}", other);
            return None;
        }
    };

    modifier_state.update_key(key, pressed);
    if !pressed {
        return None;
    }

    let modifiers = modifier_state.to_modifiers();
    Some(KeyPress::new(EvdevToKeyName::translate(key, modifiers.shift), modifiers))
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for RealKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

impl Drop for RealKeyboardListener {
    fn drop(&mut self) {
        info!("Закрытие устройства {:?}", self.device_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Modifiers;

    fn key_event(key: KeyCode, value: i32) -> evdev::InputEvent {
        evdev::InputEvent::new(EventType::KEY.0, key.code(), value)
    }

    #[test]
    fn test_press_and_autorepeat_are_keydown() {
        let mut state = ModifierState::new();

        let press = translate_event(key_event(KeyCode::KEY_Y, 1), &mut state).unwrap();
        assert_eq!(press.key, "y");
        assert!(press.modifiers.is_empty());

        let repeat = translate_event(key_event(KeyCode::KEY_Y, 2), &mut state).unwrap();
        assert_eq!(repeat.key, "y");

        assert!(translate_event(key_event(KeyCode::KEY_Y, 0), &mut state).is_none());
    }

    #[test]
    fn test_ctrl_press_is_chord() {
        let mut state = ModifierState::new();

        let ctrl = translate_event(key_event(KeyCode::KEY_LEFTCTRL, 1), &mut state).unwrap();
        assert_eq!(ctrl.key, "Control");
        assert!(ctrl.modifiers.is_chord());

        let combo = translate_event(key_event(KeyCode::KEY_C, 1), &mut state).unwrap();
        assert_eq!(combo.modifiers, Modifiers::new().with_ctrl(true));

        translate_event(key_event(KeyCode::KEY_LEFTCTRL, 0), &mut state);
        let plain = translate_event(key_event(KeyCode::KEY_C, 1), &mut state).unwrap();
        assert!(!plain.modifiers.is_chord());
    }

    #[test]
    fn test_shift_press_is_plain_key() {
        let mut state = ModifierState::new();

        let shift = translate_event(key_event(KeyCode::KEY_LEFTSHIFT, 1), &mut state).unwrap();
        assert_eq!(shift.key, "Shift");
        assert!(!shift.modifiers.is_chord());
        assert_eq!(shift.letter(), None);

        let upper = translate_event(key_event(KeyCode::KEY_Y, 1), &mut state).unwrap();
        assert_eq!(upper.key, "Y");
        assert_eq!(upper.letter(), Some('y'));
    }

    #[test]
    fn test_non_key_events_skipped() {
        let mut state = ModifierState::new();
        let sync = evdev::InputEvent::new(EventType::SYNCHRONIZATION.0, 0, 0);
        assert!(translate_event(sync, &mut state).is_none());
    }
}
