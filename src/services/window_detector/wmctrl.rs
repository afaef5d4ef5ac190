use crate::events::WindowInfo;
use crate::error::{SeqError, Result};
use tokio::process::Command;

/// `wmctrl -l` не отмечает активное окно, его id берётся из `_NET_ACTIVE_WINDOW`
pub struct WmctrlDetector;

impl WmctrlDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        self.list_windows().await?;
        self.active_window_id().await?;
        Ok(())
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let id = self.active_window_id().await?;
        let windows = self.list_windows().await?;

        find_window(&windows, id)
            .ok_or_else(|| SeqError::ServiceUnavailable(format!("Окно 0x{:x} не найдено в wmctrl", id)))
    }

    async fn active_window_id(&self) -> Result<u64> {
        let output = Command::new("xprop")
            .args(["-root", "_NET_ACTIVE_WINDOW"])
            .output()
            .await
            .map_err(|e| SeqError::ServiceUnavailable(format!("xprop не найден: {}", e)))?;

        if !output.status.success() {
            return Err(SeqError::ServiceUnavailable("xprop вернул ошибку".to_string()));
        }

        parse_active_window_id(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| SeqError::ServiceUnavailable("Активное окно не найдено".to_string()))
    }

    async fn list_windows(&self) -> Result<String> {
        let output = Command::new("wmctrl")
            .args(["-l"])
            .output()
            .await
            .map_err(|e| SeqError::ServiceUnavailable(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(SeqError::ServiceUnavailable("wmctrl вернул ошибку".to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn parse_hex_id(raw: &str) -> Option<u64> {
    let raw = raw.trim().trim_end_matches(',');
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

/// `_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3800003`; id 0 означает отсутствие фокуса
fn parse_active_window_id(stdout: &str) -> Option<u64> {
    let (_, id) = stdout.trim().rsplit_once('#')?;
    parse_hex_id(id).filter(|id| *id != 0)
}

/// Строки `wmctrl -l`: `id desktop host title...`, id с ведущими нулями
fn find_window(list: &str, id: u64) -> Option<WindowInfo> {
    list.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 || parse_hex_id(parts[0]) != Some(id) {
            return None;
        }
        Some(WindowInfo::new(parts[3..].join(" ")))
    })
}
