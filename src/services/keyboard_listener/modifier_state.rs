use crate::events::Modifiers;
use evdev::KeyCode;

#[derive(Debug, Default)]
pub struct ModifierState {
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
            meta: self.meta,
        }
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KEY_LEFTCTRL | KeyCode::KEY_RIGHTCTRL => self.ctrl = pressed,
            KeyCode::KEY_LEFTALT | KeyCode::KEY_RIGHTALT => self.alt = pressed,
            KeyCode::KEY_LEFTSHIFT | KeyCode::KEY_RIGHTSHIFT => self.shift = pressed,
            KeyCode::KEY_LEFTMETA | KeyCode::KEY_RIGHTMETA => self.meta = pressed,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_press_and_release() {
        let mut state = ModifierState::new();
        state.update_key(KeyCode::KEY_RIGHTCTRL, true);
        state.update_key(KeyCode::KEY_LEFTSHIFT, true);
        assert!(state.to_modifiers().ctrl);
        assert!(state.to_modifiers().shift);

        state.update_key(KeyCode::KEY_RIGHTCTRL, false);
        state.update_key(KeyCode::KEY_A, true);
        assert_eq!(state.to_modifiers(), Modifiers::new().with_shift(true));
    }
}
