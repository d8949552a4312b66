use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::events::{PlacementGeometry, Quadrant, WorkArea};

use super::r#trait::WindowPlacerTrait;

/// Плейсер для dry-run: рабочий стол не трогается, целевая геометрия
/// считается по синтетической рабочей области и пишется в лог. История
/// размещений сохраняется и доступна для проверок.
pub struct DryRunPlacer {
    work: WorkArea,
    placements: Arc<Mutex<Vec<(Quadrant, PlacementGeometry)>>>,
}

impl DryRunPlacer {
    pub fn new() -> Self {
        // Условный монитор 1920x1080 с панелью в 25 пикселей сверху
        Self {
            work: WorkArea::from_origin_size(0, 25, 1920, 1055),
            placements: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Разделяемый список выполненных размещений
    #[cfg(test)]
    pub fn placements(&self) -> Arc<Mutex<Vec<(Quadrant, PlacementGeometry)>>> {
        Arc::clone(&self.placements)
    }
}

#[async_trait::async_trait]
impl WindowPlacerTrait for DryRunPlacer {
    async fn probe(&mut self) -> Result<()> {
        info!("Dry-run режим - WindowPlacer работает в режиме эмуляции");
        Ok(())
    }

    async fn place(&mut self, quadrant: Quadrant) -> Result<PlacementGeometry> {
        let target = quadrant.target_in(&self.work);
        info!("Dry-run: эмулируем перенос окна в {} четверть: {}", quadrant, target);
        self.placements.lock().push((quadrant, target));
        Ok(target)
    }
}
