use crate::error::{SeqError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BY_ID_DIR: &str = "/dev/input/by-id";
const INPUT_DIR: &str = "/dev/input";

/// Слова в именах устройств, которые точно не клавиатура
const NON_KEYBOARD_HINTS: [&str; 4] = ["mouse", "deathadder", "touchpad", "trackpoint"];

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру: явный путь из конфигурации или автопоиск для "auto"
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                SeqError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Начинаем автопоиск клавиатурного устройства...");

        if let Some(device) = Self::find_by_id()? {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Some(device) = Self::find_by_event_devices()? {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        SeqError::device_not_found(
            "Не удалось найти подходящее клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<Option<PathBuf>> {
        let by_id_dir = Path::new(BY_ID_DIR);
        if !by_id_dir.exists() {
            debug!("Директория {} не существует", BY_ID_DIR);
            return Ok(None);
        }

        let mut candidates = Vec::new();
        for entry in Self::read_dir(by_id_dir)? {
            let path = entry?.path();
            let Some(priority) = path.file_name().and_then(|n| n.to_str()).and_then(by_id_priority) else {
                continue;
            };
            if Self::is_keyboard_device(&path) {
                debug!("Кандидат {:?} (приоритет {})", path, priority);
                candidates.push((priority, path));
            }
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(candidates.into_iter().next().map(|(_, path)| path))
    }

    fn find_by_event_devices() -> Result<Option<PathBuf>> {
        let mut event_devices = Vec::new();
        for entry in Self::read_dir(Path::new(INPUT_DIR))? {
            let path = entry?.path();
            let is_event = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with("event"));
            if is_event {
                event_devices.push(path);
            }
        }

        event_devices.sort();
        Ok(event_devices.into_iter().find(|path| Self::is_keyboard_device(path)))
    }

    fn read_dir(dir: &Path) -> Result<fs::ReadDir> {
        fs::read_dir(dir)
            .map_err(|e| SeqError::Permission(format!("Нет доступа к {}: {}", dir.display(), e)))
    }

    /// Устройство открывается и умеет буквы, пробел и Enter
    fn is_keyboard_device(device_path: &Path) -> bool {
        let device = match evdev::Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                return false;
            }
        };

        let name = device.name().unwrap_or("Unknown").to_lowercase();
        if NON_KEYBOARD_HINTS.iter().any(|hint| name.contains(hint)) {
            debug!("Исключаем устройство {:?} ({})", device_path, name);
            return false;
        }

        device.supported_keys().is_some_and(|keys| {
            keys.contains(evdev::KeyCode::KEY_A)
                && keys.contains(evdev::KeyCode::KEY_Z)
                && keys.contains(evdev::KeyCode::KEY_SPACE)
                && keys.contains(evdev::KeyCode::KEY_ENTER)
        })
    }
}

/// Приоритет ссылки из /dev/input/by-id или `None`, если это не клавиатура
fn by_id_priority(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    if !lower.contains("event") || NON_KEYBOARD_HINTS.iter().any(|hint| lower.contains(hint)) {
        return None;
    }

    if name.ends_with("event-kbd") {
        Some(100)
    } else if lower.contains("keyboard") {
        Some(50)
    } else if lower.contains("kbd") {
        Some(10)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyboard_device_with_specific_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(matches!(result, Err(SeqError::DeviceNotFound(_))));
    }

    #[test]
    fn test_by_id_priority() {
        assert_eq!(by_id_priority("usb-Logitech_K120-event-kbd"), Some(100));
        assert_eq!(by_id_priority("usb-Keychron_Keyboard-if01-event-joystick"), Some(50));
        assert_eq!(by_id_priority("usb-Razer_DeathAdder-event-kbd"), None);
        assert_eq!(by_id_priority("usb-Logitech_Mouse-event-mouse"), None);
        assert_eq!(by_id_priority("usb-Logitech_K120-kbd"), None);
    }
}
