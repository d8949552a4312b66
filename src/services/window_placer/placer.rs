use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{QsnapError, Result};
use crate::events::{PlacementGeometry, Quadrant};

use super::r#trait::WindowPlacerTrait;
use super::sway::SwayBackend;
use super::wmctrl::WmctrlBackend;
use super::xdotool::XdotoolBackend;

#[derive(Debug, Clone)]
enum DesktopEnvironment {
    KDE,
    GNOME,
    X11Generic,
    WaylandGeneric,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkingMethod {
    Xdotool,
    Wmctrl,
    Sway,
}

/// Размещение окон через внешние утилиты. Рабочий метод выбирается один
/// раз, в probe() перед запуском цикла; отказ метода во время работы -
/// фатальная ошибка без повторных попыток и перевыбора.
pub struct RealWindowPlacer {
    config: Arc<Config>,
    desktop_env: DesktopEnvironment,
    working_method: Option<WorkingMethod>,

    xdotool: XdotoolBackend,
    wmctrl: WmctrlBackend,
    sway: SwayBackend,
}

impl RealWindowPlacer {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Инициализация RealWindowPlacer");

        let desktop_env = Self::detect_desktop_environment();
        info!("Обнаружена среда рабочего стола: {:?}", desktop_env);

        Ok(Self {
            config,
            desktop_env,
            working_method: None,
            xdotool: XdotoolBackend::new(),
            wmctrl: WmctrlBackend::new(),
            sway: SwayBackend::new(),
        })
    }

    fn detect_desktop_environment() -> DesktopEnvironment {
        if let Ok(desktop) = std::env::var("XDG_CURRENT_DESKTOP") {
            match desktop.to_lowercase().as_str() {
                d if d.contains("kde") => return DesktopEnvironment::KDE,
                d if d.contains("gnome") => return DesktopEnvironment::GNOME,
                _ => {}
            }
        }

        if let Ok(session) = std::env::var("XDG_SESSION_TYPE") {
            match session.as_str() {
                "wayland" => return DesktopEnvironment::WaylandGeneric,
                "x11" => return DesktopEnvironment::X11Generic,
                _ => {}
            }
        }

        if let Ok(output) = Command::new("pgrep").arg("-f").arg("kwin").output() {
            if !output.stdout.is_empty() {
                return DesktopEnvironment::KDE;
            }
        }

        if let Ok(output) = Command::new("pgrep").arg("-f").arg("gnome-shell").output() {
            if !output.stdout.is_empty() {
                return DesktopEnvironment::GNOME;
            }
        }

        DesktopEnvironment::Unknown
    }

    async fn detect_working_method(&self) -> Result<WorkingMethod> {
        info!("Определяем рабочий метод размещения окон...");

        // В Wayland сессии swaymsg пробуется первым, X11 утилиты могут
        // работать через XWayland только для части окон
        let order: &[WorkingMethod] = match self.desktop_env {
            DesktopEnvironment::WaylandGeneric => {
                &[WorkingMethod::Sway, WorkingMethod::Xdotool, WorkingMethod::Wmctrl]
            }
            _ => &[WorkingMethod::Xdotool, WorkingMethod::Wmctrl, WorkingMethod::Sway],
        };

        for &method in order {
            if self.test_method(method).await.is_ok() {
                info!("Используем {:?}", method);
                return Ok(method);
            }
        }

        Err(QsnapError::ServiceUnavailable(
            "Ни один метод размещения окон не работает".to_string(),
        ))
    }

    async fn test_method(&self, method: WorkingMethod) -> Result<()> {
        match method {
            WorkingMethod::Xdotool => self.xdotool.test().await,
            WorkingMethod::Wmctrl => self.wmctrl.test().await,
            WorkingMethod::Sway => self.sway.test().await,
        }
    }
}

#[async_trait::async_trait]
impl WindowPlacerTrait for RealWindowPlacer {
    async fn probe(&mut self) -> Result<()> {
        let method = match self.config.window.placement_mode.as_str() {
            "xdotool" => WorkingMethod::Xdotool,
            "wmctrl" => WorkingMethod::Wmctrl,
            "sway" => WorkingMethod::Sway,
            _ => {
                let method = self.detect_working_method().await?;
                self.working_method = Some(method);
                return Ok(());
            }
        };

        // Явно заданный режим тоже проверяется до запуска цикла
        self.test_method(method).await?;
        info!("Используем {:?} (задан в конфигурации)", method);
        self.working_method = Some(method);
        Ok(())
    }

    async fn place(&mut self, quadrant: Quadrant) -> Result<PlacementGeometry> {
        let method = self.working_method.ok_or_else(|| {
            QsnapError::Internal("Метод размещения не выбран, probe() не вызывался".to_string())
        })?;

        debug!("Размещение в {} четверть методом {:?}", quadrant, method);

        match method {
            WorkingMethod::Xdotool => self.xdotool.place(quadrant).await,
            WorkingMethod::Wmctrl => self.wmctrl.place(quadrant).await,
            WorkingMethod::Sway => self.sway.place(quadrant).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_place_without_probe_is_internal_error() {
        let config = Arc::new(Config::default());
        let mut placer = RealWindowPlacer::new(config).unwrap();

        let result = placer.place(Quadrant::TopLeft).await;
        assert!(matches!(result, Err(QsnapError::Internal(_))));
    }
}
