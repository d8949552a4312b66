use serde::{Deserialize, Serialize};
use std::fmt;

/// Целевая четверть рабочей области монитора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub fn is_right(&self) -> bool {
        matches!(self, Quadrant::TopRight | Quadrant::BottomRight)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Quadrant::BottomLeft | Quadrant::BottomRight)
    }

    /// Вычислить целевую геометрию: половина ширины и высоты рабочей области,
    /// со сдвигом вправо/вниз для правых/нижних четвертей. Деление целочисленное,
    /// при нечётных размерах остаток отбрасывается.
    pub fn target_in(&self, work: &WorkArea) -> PlacementGeometry {
        let width = work.width() / 2;
        let height = work.height() / 2;
        let x = work.left + if self.is_right() { width } else { 0 };
        let y = work.top + if self.is_bottom() { height } else { 0 };
        PlacementGeometry {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quadrant::TopLeft => "верхняя левая",
            Quadrant::TopRight => "верхняя правая",
            Quadrant::BottomLeft => "нижняя левая",
            Quadrant::BottomRight => "нижняя правая",
        };
        write!(f, "{}", name)
    }
}

/// Рабочая область монитора (без панелей и другого системного UI).
/// Запрашивается заново перед каждым действием и никогда не кэшируется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WorkArea {
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Пересечение двух прямоугольников; None, если они не перекрываются
    pub fn intersect(&self, other: &WorkArea) -> Option<WorkArea> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if right <= left || bottom <= top {
            return None;
        }
        Some(WorkArea {
            left,
            top,
            right,
            bottom,
        })
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }
}

impl fmt::Display for WorkArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width(),
            self.height(),
            self.left,
            self.top
        )
    }
}

/// Итоговая геометрия, применяемая к окну
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl fmt::Display for PlacementGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Геометрия окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    fn as_rect(&self) -> WorkArea {
        WorkArea::from_origin_size(self.x, self.y, self.width as i32, self.height as i32)
    }
}

/// Один физический монитор в терминах X11 (имя выхода + прямоугольник)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub name: String,
    pub rect: WorkArea,
}

/// Выбрать монитор, "ближайший" к окну: сначала максимальное перекрытие
/// с прямоугольником окна, при отсутствии перекрытия — минимальное
/// расстояние от центра окна до центра монитора (семантика
/// MONITOR_DEFAULTTONEAREST).
pub fn nearest_monitor<'a>(
    monitors: &'a [Monitor],
    window: &WindowGeometry,
) -> Option<&'a Monitor> {
    if monitors.is_empty() {
        return None;
    }

    let window_rect = window.as_rect();
    let best_overlap = monitors
        .iter()
        .filter_map(|m| {
            m.rect
                .intersect(&window_rect)
                .map(|i| (i64::from(i.width()) * i64::from(i.height()), m))
        })
        .max_by_key(|(area, _)| *area);

    if let Some((_, monitor)) = best_overlap {
        return Some(monitor);
    }

    let (wx, wy) = window.center();
    monitors.iter().min_by_key(|m| {
        let (mx, my) = m.rect.center();
        let dx = i64::from(mx - wx);
        let dy = i64::from(my - wy);
        dx * dx + dy * dy
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(x: i32, y: i32, w: i32, h: i32) -> WorkArea {
        WorkArea::from_origin_size(x, y, w, h)
    }

    #[test]
    fn test_quadrant_targets_cover_all_corners() {
        let area = work(0, 25, 1920, 1055);

        assert_eq!(
            Quadrant::TopLeft.target_in(&area),
            PlacementGeometry {
                x: 0,
                y: 25,
                width: 960,
                height: 527
            }
        );
        assert_eq!(
            Quadrant::TopRight.target_in(&area),
            PlacementGeometry {
                x: 960,
                y: 25,
                width: 960,
                height: 527
            }
        );
        assert_eq!(
            Quadrant::BottomLeft.target_in(&area),
            PlacementGeometry {
                x: 0,
                y: 552,
                width: 960,
                height: 527
            }
        );
        assert_eq!(
            Quadrant::BottomRight.target_in(&area),
            PlacementGeometry {
                x: 960,
                y: 552,
                width: 960,
                height: 527
            }
        );
    }

    #[test]
    fn test_quadrant_target_on_offset_monitor() {
        // Второй монитор правее первого
        let area = work(1920, 0, 1280, 1024);
        let target = Quadrant::BottomRight.target_in(&area);
        assert_eq!(
            target,
            PlacementGeometry {
                x: 1920 + 640,
                y: 512,
                width: 640,
                height: 512
            }
        );
    }

    #[test]
    fn test_quadrant_truncates_odd_sizes() {
        let area = work(0, 0, 1001, 601);
        let target = Quadrant::TopLeft.target_in(&area);
        assert_eq!(target.width, 500);
        assert_eq!(target.height, 300);
    }

    #[test]
    fn test_intersect() {
        let a = work(0, 0, 100, 100);
        let b = work(50, 50, 100, 100);
        assert_eq!(a.intersect(&b), Some(work(50, 50, 50, 50)));

        let c = work(200, 200, 10, 10);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_nearest_monitor_prefers_overlap() {
        let monitors = vec![
            Monitor {
                name: "eDP-1".to_string(),
                rect: work(0, 0, 1920, 1080),
            },
            Monitor {
                name: "HDMI-1".to_string(),
                rect: work(1920, 0, 1920, 1080),
            },
        ];

        // Окно почти целиком на втором мониторе
        let window = WindowGeometry {
            x: 1800,
            y: 100,
            width: 800,
            height: 600,
        };
        assert_eq!(
            nearest_monitor(&monitors, &window).map(|m| m.name.as_str()),
            Some("HDMI-1")
        );
    }

    #[test]
    fn test_nearest_monitor_falls_back_to_distance() {
        let monitors = vec![
            Monitor {
                name: "eDP-1".to_string(),
                rect: work(0, 0, 1920, 1080),
            },
            Monitor {
                name: "HDMI-1".to_string(),
                rect: work(1920, 0, 1920, 1080),
            },
        ];

        // Окно за пределами обоих мониторов, но ближе ко второму
        let window = WindowGeometry {
            x: 4000,
            y: 200,
            width: 300,
            height: 300,
        };
        assert_eq!(
            nearest_monitor(&monitors, &window).map(|m| m.name.as_str()),
            Some("HDMI-1")
        );
        assert!(nearest_monitor(&[], &window).is_none());
    }
}
