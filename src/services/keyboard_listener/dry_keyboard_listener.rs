use crate::error::Result;
use crate::events::{InputEvent, KeyPress, Modifiers};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::r#trait::KeyboardListenerTrait;

/// Строка stdin, эмулирующая потерю фокуса
const BLUR_COMMAND: &str = ":blur";

pub struct DryRunKeyboardListener {
    events: mpsc::Sender<InputEvent>,
}

impl DryRunKeyboardListener {
    pub fn new(events: mpsc::Sender<InputEvent>) -> Self {
        info!("Инициализация DryRunKeyboardListener");
        Self { events }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - клавиши читаются из stdin, '{}' эмулирует потерю фокуса", BLUR_COMMAND);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            for event in line_to_events(&line) {
                if self.events.send(event).await.is_err() {
                    debug!("Канал событий закрыт - DryRunKeyboardListener завершает работу");
                    return Ok(());
                }
            }
        }

        info!("stdin закрыт, DryRunKeyboardListener завершает работу");
        Ok(())
    }
}

/// Каждый символ строки - отдельный keydown, конец строки - Enter
fn line_to_events(line: &str) -> Vec<InputEvent> {
    if line.trim() == BLUR_COMMAND {
        return vec![InputEvent::Blur];
    }

    line.chars()
        .map(|c| {
            let modifiers = Modifiers::new().with_shift(c.is_uppercase());
            InputEvent::Key(KeyPress::new(c.to_string(), modifiers))
        })
        .chain(std::iter::once(InputEvent::Key(KeyPress::plain("Enter"))))
        .collect()
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for DryRunKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(events: &[InputEvent]) -> Vec<String> {
        events
            .iter()
            .map(|event| match event {
                InputEvent::Key(press) => press.key.clone(),
                InputEvent::Blur => BLUR_COMMAND.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_line_becomes_keydowns() {
        let events = line_to_events("yU");
        assert_eq!(keys(&events), vec!["y", "U", "Enter"]);

        match &events[1] {
            InputEvent::Key(press) => assert!(press.modifiers.shift),
            InputEvent::Blur => panic!("ожидалось нажатие"),
        }
    }

    #[test]
    fn test_blur_command() {
        assert_eq!(line_to_events(" :blur "), vec![InputEvent::Blur]);
    }

    #[test]
    fn test_empty_line_is_enter() {
        assert_eq!(keys(&line_to_events("")), vec!["Enter"]);
    }
}
