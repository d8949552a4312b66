//! Chord tracking: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for tracking the
//! pressed/released state of the keys that participate in the chord and for
//! deciding, after each relevant event, whether a command fired. It MUST NOT
//! touch devices, windows or monitors. Window placement is performed
//! exclusively by the WindowPlacer service, driven by HotkeyMonitor.

mod roles;
mod tracker;

pub use self::roles::{build_role_map, ChordCommand, KeyRole};
pub use self::roles::{KEY_DOWN, KEY_ESC, KEY_LEFT, KEY_RIGHT, KEY_UP};
pub use self::tracker::ChordTracker;
