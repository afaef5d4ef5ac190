pub mod keyboard;
pub mod window;

pub use keyboard::{KeyPress, Modifiers};
pub use window::WindowInfo;

/// Событие, поступающее в SequenceWatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Нажатие клавиши (keydown, включая автоповтор)
    Key(KeyPress),
    /// Потеря фокуса: сменилось активное окно
    Blur,
}

impl From<KeyPress> for InputEvent {
    fn from(press: KeyPress) -> Self {
        InputEvent::Key(press)
    }
}
