pub mod chord;
pub mod event_source;
pub mod hotkey_monitor;
pub mod window_placer;

pub use event_source::create_event_source;
pub use hotkey_monitor::HotkeyMonitor;
pub use window_placer::create_window_placer;
