//! WindowPlacer service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for interrogating the
//! desktop (active window, monitors, work areas) and applying a quadrant
//! placement to the focused window. It MUST NOT contain any chord state or
//! polling logic. What to place and when is decided exclusively by
//! HotkeyMonitor, using ChordTracker.

mod dry_run;
mod placer;
mod sway;
mod r#trait;
mod wmctrl;
mod xdotool;

pub use self::r#trait::{create_window_placer, WindowPlacerTrait};

#[cfg(test)]
pub use self::dry_run::DryRunPlacer;
