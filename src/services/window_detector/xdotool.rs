use crate::events::WindowInfo;
use crate::error::{SeqError, Result};
use tokio::process::Command;
use tracing::debug;

pub struct XdotoolDetector;

impl XdotoolDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        let output = Command::new("xdotool").args(["getactivewindow", "getwindowname"]).output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(SeqError::ServiceUnavailable("xdotool failed".to_string()))
        }
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let output = Command::new("xdotool")
            .args(["getactivewindow", "getwindowname"])
            .output()
            .await
            .map_err(|e| {
                debug!("xdotool не найден или не работает: {}", e);
                SeqError::ServiceUnavailable(format!("xdotool не найден: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SeqError::ServiceUnavailable(format!("xdotool вернул ошибку: {}", stderr.trim())));
        }

        let title = String::from_utf8_lossy(&output.stdout).trim().to_string();

        // Класс окна необязателен, без него сравниваются только заголовки
        let class = match Command::new("xdotool")
            .args(["getactivewindow", "getwindowclassname"])
            .output()
            .await
        {
            Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).trim().to_string(),
            _ => String::new(),
        };

        Ok(WindowInfo::new(title).with_class(class))
    }
}
