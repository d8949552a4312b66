use crate::error::{QsnapError, Result};
use std::fs;
use tracing::{info, warn};

/// Проверить права доступа к необходимым ресурсам
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(QsnapError::Permission(format!(
            "Директория {} не существует",
            input_dir
        )));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir);
            Ok(())
        }
        Err(e) => Err(QsnapError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            input_dir, e
        ))),
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Для чтения устройств достаточно группы 'input':");
            warn!("   sudo usermod -a -G input $USER");
            warn!("   (затем перезайдите в систему)");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}
