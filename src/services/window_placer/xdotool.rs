use std::process::Command;
use tracing::debug;

use crate::error::{QsnapError, Result};
use crate::events::{
    nearest_monitor, Monitor, PlacementGeometry, Quadrant, WindowGeometry, WorkArea,
};

/// Размещение через xdotool: активное окно и его геометрия берутся у
/// xdotool, мониторы у xrandr, рабочая область у xprop (_NET_WORKAREA)
pub struct XdotoolBackend;

impl XdotoolBackend {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        let output = Command::new("xdotool").args(&["getactivewindow"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(QsnapError::Placement("xdotool failed".to_string()))
        }
    }

    pub async fn place(&self, quadrant: Quadrant) -> Result<PlacementGeometry> {
        let window_id = self.active_window_id()?;
        let window = self.window_geometry(&window_id)?;
        let monitors = self.list_monitors()?;

        let monitor = nearest_monitor(&monitors, &window).ok_or_else(|| {
            QsnapError::Placement("Активные мониторы не найдены".to_string())
        })?;
        debug!("Ближайший монитор: {} ({})", monitor.name, monitor.rect);

        // _NET_WORKAREA задан в координатах всего экрана; обрезаем его
        // прямоугольником монитора, чтобы получить рабочую область монитора
        let work = match self.desktop_workarea() {
            Some(workarea) => monitor.rect.intersect(&workarea).unwrap_or(monitor.rect),
            None => monitor.rect,
        };

        let target = quadrant.target_in(&work);

        self.restore(&window_id);
        self.apply(&window_id, &target)?;

        Ok(target)
    }

    fn active_window_id(&self) -> Result<String> {
        let output = Command::new("xdotool")
            .args(&["getactivewindow"])
            .output()
            .map_err(|e| QsnapError::Placement(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QsnapError::Placement(format!(
                "xdotool getactivewindow: {}",
                stderr.trim()
            )));
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(QsnapError::Placement(
                "xdotool вернул пустой id окна".to_string(),
            ));
        }
        Ok(id)
    }

    fn window_geometry(&self, window_id: &str) -> Result<WindowGeometry> {
        let output = Command::new("xdotool")
            .args(&["getwindowgeometry", "--shell", window_id])
            .output()
            .map_err(|e| QsnapError::Placement(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement(format!(
                "xdotool getwindowgeometry не удалось для окна {}",
                window_id
            )));
        }

        parse_shell_geometry(&String::from_utf8_lossy(&output.stdout))
    }

    fn list_monitors(&self) -> Result<Vec<Monitor>> {
        let output = Command::new("xrandr")
            .args(&["--listactivemonitors"])
            .output()
            .map_err(|e| QsnapError::Placement(format!("xrandr не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement(
                "xrandr --listactivemonitors вернул ошибку".to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().filter_map(parse_monitor_line).collect())
    }

    fn current_desktop(&self) -> usize {
        Command::new("xdotool")
            .args(&["get_desktop"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8_lossy(&output.stdout).trim().parse().ok())
            .unwrap_or(0)
    }

    fn desktop_workarea(&self) -> Option<WorkArea> {
        let output = Command::new("xprop")
            .args(&["-root", "_NET_WORKAREA"])
            .output()
            .ok()?;

        if !output.status.success() {
            debug!("xprop _NET_WORKAREA недоступен, используем весь монитор");
            return None;
        }

        parse_workarea(
            &String::from_utf8_lossy(&output.stdout),
            self.current_desktop(),
        )
    }

    /// Снять максимизацию перед перемещением; как и снятие в оригинале,
    /// результат не проверяется
    fn restore(&self, window_id: &str) {
        for state in ["MAXIMIZED_VERT", "MAXIMIZED_HORZ"] {
            match Command::new("xdotool")
                .args(&["windowstate", "--remove", state, window_id])
                .output()
            {
                Ok(output) if output.status.success() => {}
                Ok(output) => debug!(
                    "windowstate --remove {} не удалось: {}",
                    state,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                Err(e) => debug!("windowstate --remove {} не запустилось: {}", state, e),
            }
        }
    }

    fn apply(&self, window_id: &str, target: &PlacementGeometry) -> Result<()> {
        let move_output = Command::new("xdotool")
            .args(&[
                "windowmove",
                window_id,
                &target.x.to_string(),
                &target.y.to_string(),
            ])
            .output()
            .map_err(|e| QsnapError::Placement(format!("xdotool не найден: {}", e)))?;

        if !move_output.status.success() {
            return Err(QsnapError::Placement(format!(
                "xdotool windowmove не удалось: {}",
                String::from_utf8_lossy(&move_output.stderr).trim()
            )));
        }

        let size_output = Command::new("xdotool")
            .args(&[
                "windowsize",
                window_id,
                &target.width.to_string(),
                &target.height.to_string(),
            ])
            .output()
            .map_err(|e| QsnapError::Placement(format!("xdotool не найден: {}", e)))?;

        if !size_output.status.success() {
            return Err(QsnapError::Placement(format!(
                "xdotool windowsize не удалось: {}",
                String::from_utf8_lossy(&size_output.stderr).trim()
            )));
        }

        Ok(())
    }
}

fn parse_shell_geometry(output: &str) -> Result<WindowGeometry> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;

    for line in output.lines() {
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "X" => x = value.trim().parse().ok(),
                "Y" => y = value.trim().parse().ok(),
                "WIDTH" => width = value.trim().parse().ok(),
                "HEIGHT" => height = value.trim().parse().ok(),
                _ => {}
            }
        }
    }

    match (x, y, width, height) {
        (Some(x), Some(y), Some(width), Some(height)) => Ok(WindowGeometry {
            x,
            y,
            width,
            height,
        }),
        _ => Err(QsnapError::Placement(format!(
            "Не удалось разобрать геометрию окна: {:?}",
            output
        ))),
    }
}

// Строка вида " 0: +*eDP-1 1920/344x1080/194+0+0  eDP-1"
fn parse_monitor_line(line: &str) -> Option<Monitor> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 || !parts[0].ends_with(':') {
        return None;
    }

    let geometry = parts[2];
    let name = parts[parts.len() - 1].to_string();

    let mut sections = geometry.split('+');
    let dims = sections.next()?;
    let x: i32 = sections.next()?.parse().ok()?;
    let y: i32 = sections.next()?.parse().ok()?;

    let (width_part, height_part) = dims.split_once('x')?;
    let width: i32 = width_part.split('/').next()?.parse().ok()?;
    let height: i32 = height_part.split('/').next()?.parse().ok()?;

    Some(Monitor {
        name,
        rect: WorkArea::from_origin_size(x, y, width, height),
    })
}

// Вывод вида "_NET_WORKAREA(CARDINAL) = 0, 25, 1920, 1055, 0, 25, ..."
// по четыре значения на каждый рабочий стол
fn parse_workarea(output: &str, desktop: usize) -> Option<WorkArea> {
    let values_part = output.split('=').nth(1)?;
    let values: Vec<i32> = values_part
        .split(',')
        .filter_map(|value| value.trim().parse().ok())
        .collect();

    let offset = desktop * 4;
    let slice = if values.len() >= offset + 4 {
        &values[offset..offset + 4]
    } else if values.len() >= 4 {
        &values[..4]
    } else {
        return None;
    };

    Some(WorkArea::from_origin_size(slice[0], slice[1], slice[2], slice[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shell_geometry() {
        let output = "WINDOW=62914567\nX=128\nY=93\nWIDTH=1024\nHEIGHT=768\nSCREEN=0\n";
        let geometry = parse_shell_geometry(output).unwrap();
        assert_eq!(
            geometry,
            WindowGeometry {
                x: 128,
                y: 93,
                width: 1024,
                height: 768
            }
        );
    }

    #[test]
    fn test_parse_shell_geometry_rejects_garbage() {
        assert!(parse_shell_geometry("no geometry here").is_err());
        assert!(parse_shell_geometry("X=1\nY=2\nWIDTH=3\n").is_err());
    }

    #[test]
    fn test_parse_monitor_line() {
        let monitor = parse_monitor_line(" 0: +*eDP-1 1920/344x1080/194+0+0  eDP-1").unwrap();
        assert_eq!(monitor.name, "eDP-1");
        assert_eq!(monitor.rect, WorkArea::from_origin_size(0, 0, 1920, 1080));

        let second = parse_monitor_line(" 1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1").unwrap();
        assert_eq!(second.name, "HDMI-1");
        assert_eq!(
            second.rect,
            WorkArea::from_origin_size(1920, 0, 2560, 1440)
        );
    }

    #[test]
    fn test_parse_monitor_line_negative_offset() {
        let monitor = parse_monitor_line(" 1: +DP-2 1920/344x1080/194+-1920+0  DP-2").unwrap();
        assert_eq!(
            monitor.rect,
            WorkArea::from_origin_size(-1920, 0, 1920, 1080)
        );
    }

    #[test]
    fn test_parse_monitor_line_skips_header() {
        assert!(parse_monitor_line("Monitors: 2").is_none());
        assert!(parse_monitor_line("").is_none());
    }

    #[test]
    fn test_parse_workarea_picks_desktop() {
        let output = "_NET_WORKAREA(CARDINAL) = 0, 25, 1920, 1055, 10, 35, 1900, 1045";
        assert_eq!(
            parse_workarea(output, 0),
            Some(WorkArea::from_origin_size(0, 25, 1920, 1055))
        );
        assert_eq!(
            parse_workarea(output, 1),
            Some(WorkArea::from_origin_size(10, 35, 1900, 1045))
        );
        // Несуществующий рабочий стол откатывается к первому
        assert_eq!(
            parse_workarea(output, 7),
            Some(WorkArea::from_origin_size(0, 25, 1920, 1055))
        );
    }

    #[test]
    fn test_parse_workarea_rejects_garbage() {
        assert_eq!(parse_workarea("_NET_WORKAREA: no such atom", 0), None);
        assert_eq!(parse_workarea("_NET_WORKAREA(CARDINAL) = 1, 2", 0), None);
    }
}
