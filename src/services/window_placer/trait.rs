use crate::config::Config;
use crate::error::Result;
use crate::events::{PlacementGeometry, Quadrant};
use std::sync::Arc;

/// Trait for window placers that can run in different modes
#[async_trait::async_trait]
pub trait WindowPlacerTrait {
    /// Verify once at startup that a working placement method exists
    async fn probe(&mut self) -> Result<()>;

    /// Move the focused window into the given quadrant of the work area
    /// of its nearest monitor. Returns the applied geometry.
    async fn place(&mut self, quadrant: Quadrant) -> Result<PlacementGeometry>;
}

/// Factory function to create an appropriate window placer based on the dry_run flag
pub fn create_window_placer(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn WindowPlacerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunPlacer::new()))
    } else {
        Ok(Box::new(super::placer::RealWindowPlacer::new(config)?))
    }
}
