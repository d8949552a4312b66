pub mod keyboard;
pub mod window;

pub use keyboard::{KeyCode, KeyState, RawKeyEvent};
pub use window::{nearest_monitor, Monitor, PlacementGeometry, Quadrant, WindowGeometry, WorkArea};
