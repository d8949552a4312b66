use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::mappings::KeycodeMap;
use crate::services::chord::{KEY_DOWN, KEY_ESC, KEY_LEFT, KEY_RIGHT, KEY_UP};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub hotkeys: HotkeysConfig,
    pub window: WindowConfig,
    // Разрешённые коды управляющих клавиш - не сериализуются, строятся после загрузки
    #[serde(skip)]
    control_key_codes: Vec<u16>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
    pub poll_interval_ms: u64,
    pub event_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HotkeysConfig {
    pub control_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub placement_mode: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "qsnap_rust=info".to_string(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
                poll_interval_ms: 250,
                event_buffer_size: 32,
            },
            hotkeys: HotkeysConfig {
                control_keys: vec!["leftctrl".to_string(), "leftmeta".to_string()],
            },
            window: WindowConfig {
                placement_mode: "auto".to_string(),
            },
            control_key_codes: Vec::new(),
        };
        config.build_control_key_codes();
        config
    }
}

impl Config {
    /// Загрузка конфигурации: значения по умолчанию, поверх них TOML файл
    /// (если существует), поверх него переменные окружения QSNAP_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("QSNAP_"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        config.build_control_key_codes();

        Ok(config)
    }

    /// Резолвит имена управляющих клавиш в evdev коды.
    /// Неизвестные имена отсеяны валидацией, здесь молча пропускаются.
    pub fn build_control_key_codes(&mut self) {
        self.control_key_codes = self
            .hotkeys
            .control_keys
            .iter()
            .filter_map(|name| KeycodeMap::get_keycode(name).ok())
            .collect();
    }

    pub fn control_key_codes(&self) -> &[u16] {
        &self.control_key_codes
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек ввода
        if self.input.device_path.is_empty() {
            anyhow::bail!("device_path не может быть пустым ('auto' для автопоиска)");
        }

        if self.input.poll_interval_ms < 50 {
            anyhow::bail!("poll_interval_ms должно быть минимум 50");
        }

        if self.input.event_buffer_size == 0 {
            anyhow::bail!("event_buffer_size должно быть больше 0");
        }

        // Валидация горячих клавиш
        if self.hotkeys.control_keys.is_empty() {
            anyhow::bail!("Нужна хотя бы одна управляющая клавиша");
        }

        let mut seen_codes = Vec::new();
        for (i, name) in self.hotkeys.control_keys.iter().enumerate() {
            let code = KeycodeMap::get_keycode(name).map_err(|e| {
                anyhow::anyhow!("Неверная управляющая клавиша '{}' (#{}): {}", name, i + 1, e)
            })?;

            if matches!(code, KEY_UP | KEY_DOWN | KEY_LEFT | KEY_RIGHT | KEY_ESC) {
                anyhow::bail!(
                    "Клавиша '{}' зарезервирована за направлением или выходом",
                    name
                );
            }

            if seen_codes.contains(&code) {
                anyhow::bail!("Управляющая клавиша '{}' указана дважды", name);
            }
            seen_codes.push(code);
        }

        // Валидация настроек окон
        match self.window.placement_mode.as_str() {
            "auto" | "xdotool" | "wmctrl" | "sway" => {}
            _ => anyhow::bail!(
                "Неверный режим размещения окон: {}",
                self.window.placement_mode
            ),
        }

        Ok(())
    }
}
