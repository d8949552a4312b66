use thiserror::Error;

#[derive(Error, Debug)]
pub enum QsnapError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Устройство потеряно: {0}")]
    DeviceLost(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Ошибка позиционирования окна: {0}")]
    Placement(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl QsnapError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(QsnapError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, QsnapError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! qsnap_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::QsnapError::DeviceNotFound(format!($($arg)*))
    };
    (device_lost, $($arg:tt)*) => {
        $crate::error::QsnapError::DeviceLost(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::QsnapError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::QsnapError::ServiceUnavailable(format!($($arg)*))
    };
    (placement, $($arg:tt)*) => {
        $crate::error::QsnapError::Placement(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::QsnapError::Internal(format!($($arg)*))
    };
}
