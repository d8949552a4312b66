use crate::error::{QsnapError, Result};
use crate::services::chord::{KEY_DOWN, KEY_ESC, KEY_LEFT, KEY_RIGHT, KEY_UP};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатурное устройство, на котором возможен аккорд
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                QsnapError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ))
            };
        }

        Self::auto_find_keyboard()
    }

    fn auto_find_keyboard() -> Result<PathBuf> {
        info!("Начинаем автопоиск клавиатурного устройства...");

        let mut candidates: Vec<(PathBuf, i32)> = Vec::new();

        for (path, device) in evdev::enumerate() {
            let name = device.name().unwrap_or("Unknown").to_string();

            if Self::looks_like_pointer(&name) {
                debug!("Исключаем как мышь/тачпад: {:?} ({})", path, name);
                continue;
            }

            if !Self::supports_chord_keys(&device) {
                debug!("Устройство без клавиш аккорда: {:?} ({})", path, name);
                continue;
            }

            let priority = if name.to_lowercase().contains("keyboard") {
                100
            } else {
                10
            };

            info!("Найдена клавиатура: {:?} ({}, приоритет {})", path, name, priority);
            candidates.push((path, priority));
        }

        // При равном приоритете выбирается младший event-узел
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        match candidates.into_iter().next() {
            Some((path, _)) => Ok(path),
            None => QsnapError::device_not_found(
                "Не удалось найти клавиатуру со стрелками и Escape. \
                 Убедитесь, что пользователь добавлен в группу 'input'",
            ),
        }
    }

    fn looks_like_pointer(name: &str) -> bool {
        let name = name.to_lowercase();
        name.contains("mouse") || name.contains("touchpad") || name.contains("trackpoint")
    }

    /// Без стрелок и Escape аккорд на устройстве невозможен; порог по числу
    /// клавиш отсеивает кнопки питания и прочие однокнопочные устройства
    fn supports_chord_keys(device: &evdev::Device) -> bool {
        device.supported_keys().map_or(false, |keys| {
            let chord_keys = [KEY_LEFT, KEY_RIGHT, KEY_UP, KEY_DOWN, KEY_ESC]
                .iter()
                .all(|&code| keys.contains(evdev::KeyCode::new(code)));

            chord_keys && keys.iter().count() > 20
        })
    }
}
