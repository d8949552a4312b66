mod evdev_source;
mod scripted;
mod r#trait;

pub use self::r#trait::{create_event_source, EventSourceTrait};

#[cfg(test)]
pub use self::scripted::ScriptedEventSource;
