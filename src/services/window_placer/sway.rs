use serde::Deserialize;
use std::process::Command;
use tracing::debug;

use crate::error::{QsnapError, Result};
use crate::events::{PlacementGeometry, Quadrant, WorkArea};

/// Размещение через swaymsg. Рабочая область берётся из прямоугольника
/// workspace (панели sway уже вычтены), ближайший монитор получается сам
/// собой: workspace в sway принадлежит одному выходу.
pub struct SwayBackend;

#[derive(Debug, Deserialize)]
struct SwayNode {
    id: i64,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    focused: bool,
    rect: SwayRect,
    #[serde(default)]
    nodes: Vec<SwayNode>,
    #[serde(default)]
    floating_nodes: Vec<SwayNode>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct SwayRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[derive(Debug, Deserialize)]
struct SwayResult {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SwayBackend {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        let output = Command::new("swaymsg").args(&["-t", "get_tree"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(QsnapError::Placement("sway failed".to_string()))
        }
    }

    pub async fn place(&self, quadrant: Quadrant) -> Result<PlacementGeometry> {
        let (con_id, workspace_rect) = self.focused_window()?;
        let work = WorkArea::from_origin_size(
            workspace_rect.x,
            workspace_rect.y,
            workspace_rect.width,
            workspace_rect.height,
        );
        debug!("Рабочая область workspace: {}", work);

        let target = quadrant.target_in(&work);

        // Перевод в плавающий режим заодно снимает развёрнутое состояние
        let command = format!(
            "[con_id={}] fullscreen disable, floating enable, \
             resize set width {} px height {} px, move absolute position {} {}",
            con_id, target.width, target.height, target.x, target.y
        );
        self.run_command(&command)?;

        Ok(target)
    }

    fn focused_window(&self) -> Result<(i64, SwayRect)> {
        let output = Command::new("swaymsg")
            .args(&["-t", "get_tree"])
            .output()
            .map_err(|e| QsnapError::Placement(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement(
                "swaymsg -t get_tree вернул ошибку".to_string(),
            ));
        }

        let tree: SwayNode = serde_json::from_slice(&output.stdout).map_err(|e| {
            QsnapError::Placement(format!("Не удалось разобрать дерево sway: {}", e))
        })?;

        find_focused(&tree, None).ok_or_else(|| {
            QsnapError::Placement("Активное окно в sway не найдено".to_string())
        })
    }

    fn run_command(&self, command: &str) -> Result<()> {
        debug!("swaymsg: {}", command);

        let output = Command::new("swaymsg")
            .arg(command)
            .output()
            .map_err(|e| QsnapError::Placement(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return Err(QsnapError::Placement(format!(
                "swaymsg вернул ошибку: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let results: Vec<SwayResult> = serde_json::from_slice(&output.stdout).unwrap_or_default();
        if let Some(failed) = results.iter().find(|result| !result.success) {
            return Err(QsnapError::Placement(format!(
                "Команда sway не выполнена: {}",
                failed.error.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(())
    }
}

/// Найти сфокусированное окно и прямоугольник его workspace
fn find_focused(node: &SwayNode, workspace: Option<&SwayNode>) -> Option<(i64, SwayRect)> {
    let workspace = if node.node_type == "workspace" {
        Some(node)
    } else {
        workspace
    };

    if node.focused && node.node_type != "root" && node.node_type != "output" {
        if node.node_type == "workspace" {
            // Фокус на пустом workspace, окна нет
            return None;
        }
        return workspace.map(|ws| (node.id, ws.rect));
    }

    for child in node.nodes.iter().chain(node.floating_nodes.iter()) {
        if let Some(found) = find_focused(child, workspace) {
            return Some(found);
        }
    }

    None
}
