use evdev::KeyCode;

/// Преобразование evdev::KeyCode в идентификаторы клавиш в стиле DOM `KeyboardEvent.key`
/// Раскладка не учитывается: буквы берутся по US-раскладке, shift влияет только на регистр
pub struct EvdevToKeyName;

impl EvdevToKeyName {
    /// Получить идентификатор клавиши с учётом shift
    pub fn translate(key: KeyCode, shift: bool) -> String {
        if let Some(letter) = Self::letter(key) {
            return if shift {
                letter.to_ascii_uppercase()
            } else {
                letter.to_string()
            };
        }

        Self::named(key).unwrap_or("Unidentified").to_string()
    }

    fn letter(key: KeyCode) -> Option<&'static str> {
        match key {
            KeyCode::KEY_A => Some("a"),
            KeyCode::KEY_B => Some("b"),
            KeyCode::KEY_C => Some("c"),
            KeyCode::KEY_D => Some("d"),
            KeyCode::KEY_E => Some("e"),
            KeyCode::KEY_F => Some("f"),
            KeyCode::KEY_G => Some("g"),
            KeyCode::KEY_H => Some("h"),
            KeyCode::KEY_I => Some("i"),
            KeyCode::KEY_J => Some("j"),
            KeyCode::KEY_K => Some("k"),
            KeyCode::KEY_L => Some("l"),
            KeyCode::KEY_M => Some("m"),
            KeyCode::KEY_N => Some("n"),
            KeyCode::KEY_O => Some("o"),
            KeyCode::KEY_P => Some("p"),
            KeyCode::KEY_Q => Some("q"),
            KeyCode::KEY_R => Some("r"),
            KeyCode::KEY_S => Some("s"),
            KeyCode::KEY_T => Some("t"),
            KeyCode::KEY_U => Some("u"),
            KeyCode::KEY_V => Some("v"),
            KeyCode::KEY_W => Some("w"),
            KeyCode::KEY_X => Some("x"),
            KeyCode::KEY_Y => Some("y"),
            KeyCode::KEY_Z => Some("z"),
            _ => None,
        }
    }

    fn named(key: KeyCode) -> Option<&'static str> {
        match key {
            // Цифровые клавиши
            KeyCode::KEY_1 => Some("1"),
            KeyCode::KEY_2 => Some("2"),
            KeyCode::KEY_3 => Some("3"),
            KeyCode::KEY_4 => Some("4"),
            KeyCode::KEY_5 => Some("5"),
            KeyCode::KEY_6 => Some("6"),
            KeyCode::KEY_7 => Some("7"),
            KeyCode::KEY_8 => Some("8"),
            KeyCode::KEY_9 => Some("9"),
            KeyCode::KEY_0 => Some("0"),

            // Специальные клавиши
            KeyCode::KEY_SPACE => Some(" "),
            KeyCode::KEY_ENTER | KeyCode::KEY_KPENTER => Some("Enter"),
            KeyCode::KEY_ESC => Some("Escape"),
            KeyCode::KEY_BACKSPACE => Some("Backspace"),
            KeyCode::KEY_TAB => Some("Tab"),
            KeyCode::KEY_DELETE => Some("Delete"),
            KeyCode::KEY_INSERT => Some("Insert"),
            KeyCode::KEY_HOME => Some("Home"),
            KeyCode::KEY_END => Some("End"),
            KeyCode::KEY_PAGEUP => Some("PageUp"),
            KeyCode::KEY_PAGEDOWN => Some("PageDown"),
            KeyCode::KEY_CAPSLOCK => Some("CapsLock"),
            KeyCode::KEY_MINUS => Some("-"),
            KeyCode::KEY_EQUAL => Some("="),
            KeyCode::KEY_DOT => Some("."),
            KeyCode::KEY_COMMA => Some(","),
            KeyCode::KEY_SLASH => Some("/"),

            // Стрелки
            KeyCode::KEY_UP => Some("ArrowUp"),
            KeyCode::KEY_DOWN => Some("ArrowDown"),
            KeyCode::KEY_LEFT => Some("ArrowLeft"),
            KeyCode::KEY_RIGHT => Some("ArrowRight"),

            // Модификаторы
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => Some("Control"),
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => Some("Alt"),
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => Some("Shift"),
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => Some("Meta"),

            // Функциональные клавиши
            KeyCode::KEY_F1 => Some("F1"),
            KeyCode::KEY_F2 => Some("F2"),
            KeyCode::KEY_F3 => Some("F3"),
            KeyCode::KEY_F4 => Some("F4"),
            KeyCode::KEY_F5 => Some("F5"),
            KeyCode::KEY_F6 => Some("F6"),
            KeyCode::KEY_F7 => Some("F7"),
            KeyCode::KEY_F8 => Some("F8"),
            KeyCode::KEY_F9 => Some("F9"),
            KeyCode::KEY_F10 => Some("F10"),
            KeyCode::KEY_F11 => Some("F11"),
            KeyCode::KEY_F12 => Some("F12"),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_keys() {
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_A, false), "a");
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_Z, false), "z");
    }

    #[test]
    fn test_shift_uppercases_letters_only() {
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_Y, true), "Y");
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_1, true), "1");
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_SPACE, false), " ");
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_ENTER, false), "Enter");
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_RIGHTCTRL, false), "Control");
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_LEFTSHIFT, true), "Shift");
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(EvdevToKeyName::translate(KeyCode::KEY_VOLUMEUP, false), "Unidentified");
    }
}
