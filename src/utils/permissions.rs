use crate::error::{SeqError, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";

/// Проверить права доступа к устройствам ввода
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access(Path::new(INPUT_DIR))?;
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(SeqError::Permission(format!(
            "Директория {} не существует",
            input_dir.display()
        )));
    }

    fs::read_dir(input_dir).map_err(|e| {
        SeqError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir.display(),
            e
        ))
    })?;

    info!("Доступ к {} подтвержден", input_dir.display());
    Ok(())
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            // Из-под root xdg-open откроет браузер не в сессии пользователя
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Браузер может открыться не в сессии пользователя.");
            for line in setup_commands() {
                warn!("   {}", line);
            }
        }
        Ok(user) => info!("Приложение запущено от имени пользователя: {}", user),
        Err(_) => warn!("Не удалось определить пользователя"),
    }
}

/// Рекомендуемые команды для настройки прав доступа
pub fn setup_commands() -> Vec<&'static str> {
    vec![
        "# Добавить пользователя в группу input:",
        "sudo usermod -a -G input $USER",
        "# После выполнения команды перезайдите в систему",
    ]
}
