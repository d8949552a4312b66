use std::process::Command;
use tracing::debug;

use crate::error::{QsnapError, Result};
use crate::events::{PlacementGeometry, Quadrant, WorkArea};

/// Размещение через wmctrl: активное окно берётся у xprop
/// (_NET_ACTIVE_WINDOW), рабочая область у wmctrl -d. Мониторы wmctrl не
/// различает, так что рабочей областью считается весь текущий стол.
pub struct WmctrlBackend;

impl WmctrlBackend {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        let output = Command::new("wmctrl").args(&["-d"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(QsnapError::Placement("wmctrl failed".to_string()))
        }
    }

    pub async fn place(&self, quadrant: Quadrant) -> Result<PlacementGeometry> {
        let window_id = self.active_window_id()?;
        let work = self.current_workarea()?;
        debug!("Рабочая область текущего стола: {}", work);

        let target = quadrant.target_in(&work);

        self.restore(&window_id);
        self.apply(&window_id, &target)?;

        Ok(target)
    }

    fn active_window_id(&self) -> Result<String> {
        let output = Command::new("xprop")
            .args(&["-root", "_NET_ACTIVE_WINDOW"])
            .output()
            .map_err(|e| QsnapError::Placement(format!("xprop не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement(
                "xprop _NET_ACTIVE_WINDOW вернул ошибку".to_string(),
            ));
        }

        parse_active_window(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            QsnapError::Placement("Активное окно не найдено".to_string())
        })
    }

    fn current_workarea(&self) -> Result<WorkArea> {
        let output = Command::new("wmctrl")
            .args(&["-d"])
            .output()
            .map_err(|e| QsnapError::Placement(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement("wmctrl -d вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .filter_map(parse_workarea_line)
            .next()
            .ok_or_else(|| {
                QsnapError::Placement("Текущий рабочий стол не найден в wmctrl -d".to_string())
            })
    }

    /// Снять максимизацию перед перемещением; результат не проверяется
    fn restore(&self, window_id: &str) {
        match Command::new("wmctrl")
            .args(&[
                "-i",
                "-r",
                window_id,
                "-b",
                "remove,maximized_vert,maximized_horz",
            ])
            .output()
        {
            Ok(output) if output.status.success() => {}
            Ok(output) => debug!(
                "wmctrl -b remove не удалось: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => debug!("wmctrl -b remove не запустилось: {}", e),
        }
    }

    fn apply(&self, window_id: &str, target: &PlacementGeometry) -> Result<()> {
        let move_arg = format!(
            "0,{},{},{},{}",
            target.x, target.y, target.width, target.height
        );

        let output = Command::new("wmctrl")
            .args(&["-i", "-r", window_id, "-e", &move_arg])
            .output()
            .map_err(|e| QsnapError::Placement(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement(format!(
                "wmctrl -e не удалось: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

// Вывод вида "_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3c00007"
fn parse_active_window(output: &str) -> Option<String> {
    let after_hash = output.split('#').nth(1)?;
    let id = after_hash
        .split_whitespace()
        .next()?
        .trim_matches(',')
        .to_string();

    if id.starts_with("0x") && id != "0x0" {
        Some(id)
    } else {
        None
    }
}

// Строка вида "0  * DG: 3840x1080  VP: 0,0  WA: 0,25 3840x1055  Workspace 1",
// текущий стол отмечен звёздочкой
fn parse_workarea_line(line: &str) -> Option<WorkArea> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.get(1) != Some(&"*") {
        return None;
    }

    let wa_index = parts.iter().position(|&part| part == "WA:")?;
    let origin = parts.get(wa_index + 1)?;
    let size = parts.get(wa_index + 2)?;

    let (x, y) = origin.split_once(',')?;
    let (width, height) = size.split_once('x')?;

    Some(WorkArea::from_origin_size(
        x.parse().ok()?,
        y.parse().ok()?,
        width.parse().ok()?,
        height.parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_window() {
        assert_eq!(
            parse_active_window("_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3c00007"),
            Some("0x3c00007".to_string())
        );
        assert_eq!(
            parse_active_window("_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3c00007, 0x0"),
            Some("0x3c00007".to_string())
        );
    }

    #[test]
    fn test_parse_active_window_none_when_absent() {
        assert_eq!(
            parse_active_window("_NET_ACTIVE_WINDOW(WINDOW): window id # 0x0"),
            None
        );
        assert_eq!(parse_active_window("_NET_ACTIVE_WINDOW: no such atom"), None);
    }

    #[test]
    fn test_parse_workarea_line() {
        let current = "0  * DG: 3840x1080  VP: 0,0  WA: 0,25 3840x1055  Workspace 1";
        assert_eq!(
            parse_workarea_line(current),
            Some(WorkArea::from_origin_size(0, 25, 3840, 1055))
        );

        // Не текущий стол пропускается
        let other = "1  - DG: 3840x1080  VP: N/A  WA: 0,25 3840x1055  Workspace 2";
        assert_eq!(parse_workarea_line(other), None);
    }
}
