use serde::{Deserialize, Serialize};
use std::fmt;

/// Информация об активном окне
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub title: String,
    pub class: String,
}

impl WindowInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            class: String::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Окно считается другим, если изменился заголовок или класс
    pub fn differs_from(&self, other: &WindowInfo) -> bool {
        self.title != other.title || self.class != other.class
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "\"{}\"", self.title)
        } else {
            write!(f, "\"{}\" ({})", self.title, self.class)
        }
    }
}
