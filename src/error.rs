use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeqError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Не удалось открыть адрес: {0}")]
    Navigation(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl SeqError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(SeqError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, SeqError>;
