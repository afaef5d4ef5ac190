use crate::error::{Result, SeqError};
use tracing::info;

/// Полноценный переход на внешний адрес
pub trait Navigator: Send {
    fn navigate(&mut self, url: &str) -> Result<()>;
}

impl<T: Navigator + ?Sized> Navigator for Box<T> {
    fn navigate(&mut self, url: &str) -> Result<()> {
        (**self).navigate(url)
    }
}

/// Открывает адрес в браузере по умолчанию (xdg-open и аналоги)
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        open::that_detached(url)
            .map_err(|e| SeqError::Navigation(format!("{}: {}", url, e)))
    }
}

/// Только логирует переход
pub struct DryRunNavigator;

impl Navigator for DryRunNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        info!("[DRY RUN] Переход на {}", url);
        Ok(())
    }
}

/// Factory function to create a navigator based on the dry_run flag
pub fn create_navigator(dry_run: bool) -> Box<dyn Navigator> {
    if dry_run {
        Box::new(DryRunNavigator)
    } else {
        Box::new(BrowserNavigator)
    }
}
