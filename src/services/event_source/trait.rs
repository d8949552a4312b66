use crate::config::Config;
use crate::error::Result;
use crate::events::RawKeyEvent;
use std::sync::Arc;

/// Trait for keyboard event sources that can run in different modes
#[async_trait::async_trait]
pub trait EventSourceTrait {
    /// Take accumulated key events, at most `max_events` per call.
    /// An empty vec means nothing happened since the previous poll.
    async fn poll(&mut self, max_events: usize) -> Result<Vec<RawKeyEvent>>;
}

/// Factory function to create an appropriate event source based on the dry_run flag
pub fn create_event_source(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn EventSourceTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::scripted::ScriptedEventSource::demo(
            &config,
        )))
    } else {
        Ok(Box::new(super::evdev_source::EvdevEventSource::new(
            config,
        )?))
    }
}
